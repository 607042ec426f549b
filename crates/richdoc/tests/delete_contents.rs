mod common;

use common::{assert_delete, assert_delete_with, bold_attributes, delete_in, new_document};
use richdoc::treetext::{get_data, set_data, set_data_with_options, SetDataOptions};
use richdoc::{delete_contents, ComposerError, DeleteOptions, ModelError, Writer};
use serde_json::json;

const MERGE: DeleteOptions = DeleteOptions { merge: true };

// ── Simple scenarios ──────────────────────────────────────────────────────

#[test]
fn does_nothing_on_collapsed_selection() {
    assert_delete("f[]oo", "f[]oo", DeleteOptions::default());
}

#[test]
fn deletes_single_character() {
    assert_delete("f[o]o", "f[]o", DeleteOptions::default());
}

#[test]
fn deletes_single_character_backward_selection() {
    assert_delete_with(
        "f[o]o",
        "f[]o",
        DeleteOptions::default(),
        SetDataOptions {
            last_range_backward: true,
            ..Default::default()
        },
    );
}

#[test]
fn deletes_whole_text() {
    assert_delete("[foo]", "[]", DeleteOptions::default());
}

#[test]
fn deletes_whole_text_between_nodes() {
    assert_delete(
        "<image></image>[foo]<image></image>",
        "<image></image>[]<image></image>",
        DeleteOptions::default(),
    );
}

#[test]
fn deletes_an_element() {
    assert_delete("x[<image></image>]y", "x[]y", DeleteOptions::default());
}

#[test]
fn deletes_a_bunch_of_nodes() {
    assert_delete("w[x<image></image>y]z", "w[]z", DeleteOptions::default());
}

#[test]
fn merge_option_is_harmless_on_flat_content() {
    assert_delete("w[x<image></image>y]z", "w[]z", MERGE);
}

// ── Text attributes ───────────────────────────────────────────────────────

#[test]
fn keeps_caret_attributes_when_first_half_has_them() {
    let mut doc = new_document();
    set_data_with_options(
        &mut doc,
        "<$text bold=\"true\">fo[o</$text>b]ar",
        SetDataOptions {
            selection_attributes: bold_attributes(),
            ..Default::default()
        },
    )
    .unwrap();
    delete_in(&mut doc, DeleteOptions::default());
    assert_eq!(get_data(&doc), "<$text bold=\"true\">fo[]</$text>ar");
    assert_eq!(doc.selection().get_attribute("bold"), Some(&json!(true)));
}

#[test]
fn drops_caret_attributes_when_second_half_has_them() {
    let mut doc = new_document();
    set_data_with_options(
        &mut doc,
        "fo[o<$text bold=\"true\">b]ar</$text>",
        SetDataOptions {
            selection_attributes: bold_attributes(),
            ..Default::default()
        },
    )
    .unwrap();
    delete_in(&mut doc, DeleteOptions::default());
    assert_eq!(get_data(&doc), "fo[]<$text bold=\"true\">ar</$text>");
    assert_eq!(doc.selection().get_attribute("bold"), None);
}

#[test]
fn clears_caret_attributes_when_content_is_emptied() {
    let mut doc = new_document();
    set_data_with_options(
        &mut doc,
        "<paragraph>x</paragraph>\
         <paragraph>[<$text bold=\"true\">foo</$text>]</paragraph>\
         <paragraph>y</paragraph>",
        SetDataOptions {
            selection_attributes: bold_attributes(),
            ..Default::default()
        },
    )
    .unwrap();
    delete_in(&mut doc, DeleteOptions::default());
    assert_eq!(
        get_data(&doc),
        "<paragraph>x</paragraph><paragraph>[]</paragraph><paragraph>y</paragraph>"
    );
    assert_eq!(doc.selection().get_attribute("bold"), None);
}

#[test]
fn leaves_caret_attributes_when_surrounding_text_has_them() {
    let mut doc = new_document();
    set_data_with_options(
        &mut doc,
        "<paragraph>x<$text bold=\"true\">a[foo]b</$text>y</paragraph>",
        SetDataOptions {
            selection_attributes: bold_attributes(),
            ..Default::default()
        },
    )
    .unwrap();
    delete_in(&mut doc, DeleteOptions::default());
    assert_eq!(
        get_data(&doc),
        "<paragraph>x<$text bold=\"true\">a[]b</$text>y</paragraph>"
    );
    assert_eq!(doc.selection().get_attribute("bold"), Some(&json!(true)));
}

// ── Multi-element scenarios ───────────────────────────────────────────────

#[test]
fn does_not_merge_when_there_is_no_need() {
    assert_delete(
        "<paragraph>x</paragraph><paragraph>[foo]</paragraph><paragraph>y</paragraph>",
        "<paragraph>x</paragraph><paragraph>[]</paragraph><paragraph>y</paragraph>",
        MERGE,
    );
}

#[test]
fn merges_second_element_into_the_first_same_name() {
    assert_delete(
        "<paragraph>x</paragraph><paragraph>fo[o</paragraph><paragraph>b]ar</paragraph><paragraph>y</paragraph>",
        "<paragraph>x</paragraph><paragraph>fo[]ar</paragraph><paragraph>y</paragraph>",
        MERGE,
    );
}

#[test]
fn does_not_merge_without_the_option() {
    assert_delete(
        "<paragraph>x</paragraph><paragraph>fo[o</paragraph><paragraph>b]ar</paragraph><paragraph>y</paragraph>",
        "<paragraph>x</paragraph><paragraph>fo[]</paragraph><paragraph>ar</paragraph><paragraph>y</paragraph>",
        DeleteOptions::default(),
    );
}

#[test]
fn merges_second_element_into_the_first_different_name() {
    assert_delete(
        "<paragraph>x</paragraph><heading1>fo[o</heading1><paragraph>b]ar</paragraph><paragraph>y</paragraph>",
        "<paragraph>x</paragraph><heading1>fo[]ar</heading1><paragraph>y</paragraph>",
        MERGE,
    );
}

#[test]
fn merges_second_element_different_name_backward_selection() {
    assert_delete_with(
        "<paragraph>x</paragraph><heading1>fo[o</heading1><paragraph>b]ar</paragraph><paragraph>y</paragraph>",
        "<paragraph>x</paragraph><heading1>fo[]ar</heading1><paragraph>y</paragraph>",
        MERGE,
        SetDataOptions {
            last_range_backward: true,
            ..Default::default()
        },
    );
}

#[test]
fn merges_second_element_into_the_first_different_attrs() {
    assert_delete(
        "<paragraph>x</paragraph><paragraph align=\"l\">fo[o</paragraph><paragraph>b]ar</paragraph><paragraph>y</paragraph>",
        "<paragraph>x</paragraph><paragraph align=\"l\">fo[]ar</paragraph><paragraph>y</paragraph>",
        MERGE,
    );
}

#[test]
fn merges_second_element_into_an_empty_first_element() {
    assert_delete(
        "<paragraph>x</paragraph><heading1>[</heading1><paragraph>fo]o</paragraph><paragraph>y</paragraph>",
        "<paragraph>x</paragraph><heading1>[]o</heading1><paragraph>y</paragraph>",
        MERGE,
    );
}

#[test]
fn merges_elements_when_deep_nested() {
    assert_delete(
        "<paragraph>x<pchild>fo[o</pchild></paragraph><paragraph><pchild>b]ar</pchild>y</paragraph>",
        "<paragraph>x<pchild>fo[]ar</pchild>y</paragraph>",
        MERGE,
    );
}

#[test]
fn merges_consecutive_elements_over_an_empty_range() {
    assert_delete(
        "<paragraph>foo[</paragraph><paragraph>]bar</paragraph>",
        "<paragraph>foo[]bar</paragraph>",
        MERGE,
    );
}

#[test]
fn merges_elements_when_left_end_deep_nested() {
    assert_delete(
        "<paragraph>x<pchild>fo[o</pchild></paragraph><paragraph>b]ary</paragraph>",
        "<paragraph>x<pchild>fo[]</pchild>ary</paragraph>",
        MERGE,
    );
}

#[test]
fn merges_elements_when_right_end_deep_nested() {
    assert_delete(
        "<paragraph>xfo[o</paragraph><paragraph><pchild>b]ar</pchild>y<image></image></paragraph>",
        "<paragraph>xfo[]<pchild>ar</pchild>y<image></image></paragraph>",
        MERGE,
    );
}

#[test]
fn merges_elements_when_more_content_in_the_right_branch() {
    assert_delete(
        "<paragraph>xfo[o</paragraph><paragraph>b]a<pchild>r</pchild>y</paragraph>",
        "<paragraph>xfo[]a<pchild>r</pchild>y</paragraph>",
        MERGE,
    );
}

#[test]
fn leaves_just_one_element_when_everything_is_selected() {
    assert_delete(
        "<heading1>[x</heading1><paragraph>foo</paragraph><paragraph>y]</paragraph>",
        "<heading1>[]</heading1>",
        MERGE,
    );
}

// ── Schema rejections ─────────────────────────────────────────────────────

#[test]
fn schema_rejection_aborts_the_call_with_prior_operations_applied() {
    // merging the nested chains needs the right pchild moved into the
    // heading1, which the schema forbids; the removals issued before the
    // rejection stay applied
    let mut doc = new_document();
    set_data(
        &mut doc,
        "<heading1>x<pchild>fo[o</pchild></heading1><paragraph><pchild>b]ar</pchild>y</paragraph>",
    )
    .unwrap();
    let mut writer = Writer::new(&mut doc);
    let err = delete_contents(&mut writer, MERGE);
    assert_eq!(
        err,
        Err(ComposerError::Model(ModelError::SchemaViolation {
            parent: "heading1".to_owned(),
            child: "pchild".to_owned(),
        }))
    );
    let batch = writer.finish();
    assert_eq!(batch.operations().len(), 2);
    assert_eq!(
        get_data(&doc),
        "<heading1>x<pchild>fo[</pchild></heading1><paragraph><pchild>a]r</pchild>y</paragraph>"
    );
}

// ── Multiple ranges ───────────────────────────────────────────────────────

#[test]
fn deletes_every_range_of_a_multi_range_selection() {
    assert_delete(
        "<paragraph>a[b]c</paragraph><paragraph>d[e]f</paragraph>",
        "<paragraph>a[]c</paragraph><paragraph>df</paragraph>",
        DeleteOptions::default(),
    );
}

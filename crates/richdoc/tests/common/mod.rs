#![allow(dead_code)]

use richdoc::treetext::{get_data, set_data_with_options, SetDataOptions};
use richdoc::{delete_contents, Attributes, DeleteOptions, Document, Writer};
use serde_json::json;

/// Document with the schema the deletion scenarios assume: inline images,
/// two block types, a nested `pchild`, text allowed directly in the root,
/// and a few formatting attributes.
pub fn new_document() -> Document {
    let mut doc = Document::new();
    let schema = doc.schema_mut();
    schema.register_item("image", Some("$inline"));
    schema.register_item("paragraph", Some("$block"));
    schema.register_item("heading1", Some("$block"));
    schema.register_item("pchild", None);
    schema.allow_in("pchild", "paragraph");
    schema.allow_in("$text", "$root");
    schema.allow_in("image", "$root");
    schema.allow_attributes("$text", &["bold", "italic"]);
    schema.allow_attributes("paragraph", &["align"]);
    doc
}

pub fn bold_attributes() -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert("bold".to_owned(), json!(true));
    attrs
}

pub fn delete_in(doc: &mut Document, options: DeleteOptions) {
    let mut writer = Writer::new(doc);
    delete_contents(&mut writer, options).unwrap();
}

pub fn assert_delete(input: &str, expected: &str, options: DeleteOptions) {
    assert_delete_with(input, expected, options, SetDataOptions::default());
}

pub fn assert_delete_with(
    input: &str,
    expected: &str,
    options: DeleteOptions,
    data_options: SetDataOptions,
) {
    let mut doc = new_document();
    set_data_with_options(&mut doc, input, data_options).unwrap();
    delete_in(&mut doc, options);
    assert_eq!(get_data(&doc), expected, "input: {input}");
}

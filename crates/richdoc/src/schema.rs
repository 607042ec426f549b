//! Schema: which node types may nest where, and which attributes they may
//! carry.
//!
//! The schema is a registry consumed by the writer; the deletion algorithm
//! never re-implements its decisions.  Items form is-a chains
//! (`paragraph` is-a `$block`), and allow rules grant placement and
//! attribute rights against any name in a chain.
//!
//! Base items `$root`, `$block`, `$inline`, and `$text` (is-a `$inline`)
//! are pre-registered with the rules `$block in $root` and
//! `$inline in $block`.

use indexmap::IndexMap;

/// A placement/attribute grant: `name` (or anything that is-a `name`) may
/// appear inside any of `inside`, and may carry any of `attributes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowRule {
    pub name: String,
    pub inside: Vec<String>,
    pub attributes: Vec<String>,
}

/// Item registry plus allow rules.
#[derive(Debug, Clone)]
pub struct Schema {
    items: IndexMap<String, Option<String>>,
    rules: Vec<AllowRule>,
}

impl Schema {
    pub fn new() -> Self {
        let mut schema = Self {
            items: IndexMap::new(),
            rules: Vec::new(),
        };
        schema.register_item("$root", None);
        schema.register_item("$block", None);
        schema.register_item("$inline", None);
        schema.register_item("$text", Some("$inline"));
        schema.allow_in("$block", "$root");
        schema.allow_in("$inline", "$block");
        schema
    }

    /// Register an item, optionally as a subtype of another item.
    pub fn register_item(&mut self, name: &str, is_a: Option<&str>) {
        self.items.insert(name.to_owned(), is_a.map(str::to_owned));
    }

    pub fn allow(&mut self, rule: AllowRule) {
        self.rules.push(rule);
    }

    /// Allow `name` (and its subtypes) inside `inside`.
    pub fn allow_in(&mut self, name: &str, inside: &str) {
        self.allow(AllowRule {
            name: name.to_owned(),
            inside: vec![inside.to_owned()],
            attributes: Vec::new(),
        });
    }

    /// Allow `name` (and its subtypes) to carry each of `attributes`.
    pub fn allow_attributes(&mut self, name: &str, attributes: &[&str]) {
        self.allow(AllowRule {
            name: name.to_owned(),
            inside: Vec::new(),
            attributes: attributes.iter().map(|a| (*a).to_owned()).collect(),
        });
    }

    /// `name` plus its is-a ancestors, in order.
    fn chain<'a>(&'a self, name: &'a str) -> Vec<&'a str> {
        let mut chain = vec![name];
        let mut cur = name;
        while let Some(Some(base)) = self.items.get(cur) {
            chain.push(base.as_str());
            cur = base;
        }
        chain
    }

    /// May a `child_name` node appear inside a `parent_name` node?
    pub fn can_contain(&self, parent_name: &str, child_name: &str) -> bool {
        let child_chain = self.chain(child_name);
        let parent_chain = self.chain(parent_name);
        self.rules.iter().any(|rule| {
            child_chain.contains(&rule.name.as_str())
                && rule
                    .inside
                    .iter()
                    .any(|inside| parent_chain.contains(&inside.as_str()))
        })
    }

    /// May a `name` node carry the attribute `attr`?
    pub fn can_have_attribute(&self, name: &str, attr: &str) -> bool {
        let chain = self.chain(name);
        self.rules.iter().any(|rule| {
            chain.contains(&rule.name.as_str()) && rule.attributes.iter().any(|a| a == attr)
        })
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

//! Key-value context for matter templates.
//!
//! A matter chapter starts with a block delimited by two `---` lines holding a
//! flat YAML mapping. Keys ending in a number (`Collaborator 1`,
//! `Collaborator 2`) are gathered, in document order, into a list under the
//! pluralised base key (`Collaborators`); blank values are dropped from such
//! lists. Everything after the closing delimiter is the `Body`.

use serde_yaml::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextValue {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatterContext {
    values: HashMap<String, ContextValue>,
    body: String,
}

impl MatterContext {
    pub fn parse(markdown: &str) -> MatterContext {
        let Some((block, body)) = split_block(markdown) else {
            log::warn!("matter chapter has no `---` delimited block");
            return MatterContext::default();
        };

        let mut context = MatterContext {
            values: HashMap::new(),
            body,
        };
        if block.is_empty() {
            log::warn!("matter chapter has an empty block");
            return context;
        }

        let mapping = match serde_yaml::from_str::<Value>(&block) {
            Ok(Value::Mapping(mapping)) => mapping,
            Ok(_) => {
                log::warn!("matter block is not a list of `Key: value` lines");
                return context;
            }
            Err(e) => {
                log::warn!("failed to parse matter block: {e}");
                return context;
            }
        };

        for (key, value) in mapping {
            let Some(key) = scalar_text(&key) else {
                continue;
            };
            let value = scalar_text(&value).unwrap_or_default();
            context.insert(&key, value);
        }

        context
    }

    fn insert(&mut self, key: &str, value: String) {
        match list_key(key) {
            Some(list_key) => {
                let entry = self
                    .values
                    .entry(list_key)
                    .or_insert_with(|| ContextValue::List(Vec::new()));
                if let ContextValue::List(items) = entry {
                    if !value.trim().is_empty() {
                        items.push(value);
                    }
                }
            }
            None => {
                self.values
                    .insert(key.to_string(), ContextValue::Text(value));
            }
        }
    }

    /// A single value, or an empty string when missing.
    pub fn text(&self, key: &str) -> &str {
        match self.values.get(key) {
            Some(ContextValue::Text(text)) => text.as_str(),
            _ => "",
        }
    }

    /// A numbered list, or an empty slice when missing.
    pub fn list(&self, key: &str) -> &[String] {
        match self.values.get(key) {
            Some(ContextValue::List(items)) => items.as_slice(),
            _ => &[],
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Split the text into the trimmed block between the first two `---` lines and
/// the trimmed text after it.
fn split_block(markdown: &str) -> Option<(String, String)> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut delimiters = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.trim() == "---")
        .map(|(i, _)| i);
    let start = delimiters.next()?;
    let end = delimiters.next()?;

    let block = lines[start + 1..end].join("\n").trim().to_string();
    let body = lines[end + 1..].join("\n").trim().to_string();
    Some((block, body))
}

/// `Collaborator Role 2` -> `Collaborator Roles`
///
/// The last whitespace-separated token must be a whole integer, optionally
/// signed (`Editor\t02`, `Editor +3`); `Editor 2a` stays a plain key.
fn list_key(key: &str) -> Option<String> {
    let (base, last) = key.trim().rsplit_once(char::is_whitespace)?;
    last.parse::<i64>().ok()?;
    let base = base.trim_end();
    if base.is_empty() {
        return None;
    }
    Some(format!("{base}s"))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blank_numbered_entries_are_dropped() {
        let context = MatterContext::parse("--- \nCollaborator 1: A\nCollaborator 2: \n---\nBody text");
        assert_eq!(context.list("Collaborators"), ["A".to_string()]);
        assert_eq!(context.body(), "Body text");
    }

    #[test]
    fn numbered_keys_keep_document_order() {
        let context = MatterContext::parse(
            "---\nBlurb 2: second\nBlurb 1: first\nSource 1: Weekly\nTitle: Reviews\n---\n",
        );
        assert_eq!(
            context.list("Blurbs"),
            ["second".to_string(), "first".to_string()]
        );
        assert_eq!(context.list("Sources"), ["Weekly".to_string()]);
        assert_eq!(context.text("Title"), "Reviews");
    }

    #[test]
    fn scalars_become_text() {
        let context = MatterContext::parse("---\nYear: 2024\nDraft: true\nBook Name:\n---");
        assert_eq!(context.text("Year"), "2024");
        assert_eq!(context.text("Draft"), "true");
        assert_eq!(context.text("Book Name"), "");
        assert_eq!(context.text("Missing"), "");
        assert!(context.list("Missing").is_empty());
    }

    #[test]
    fn malformed_block_still_keeps_body() {
        let context = MatterContext::parse("---\nTitle: [unclosed\n---\n\nStill here.\n");
        assert!(context.is_empty());
        assert_eq!(context.body(), "Still here.");
    }

    #[test]
    fn no_block_means_empty_context() {
        let context = MatterContext::parse("Just some text.");
        assert!(context.is_empty());
        assert_eq!(context.body(), "");
    }

    #[test]
    fn can_derive_list_keys() {
        assert_eq!(list_key("ISBN 1").as_deref(), Some("ISBNs"));
        assert_eq!(list_key("Collaborator Role 12").as_deref(), Some("Collaborator Roles"));
        assert_eq!(list_key("Link To Amazon"), None);
        assert_eq!(list_key("3"), None);
    }

    #[test]
    fn list_keys_split_on_any_whitespace() {
        assert_eq!(list_key("Editor\t2").as_deref(), Some("Editors"));
        assert_eq!(list_key("Editor  02").as_deref(), Some("Editors"));
        assert_eq!(list_key("Editor +3").as_deref(), Some("Editors"));
        assert_eq!(list_key("Editor 2a"), None);
    }
}

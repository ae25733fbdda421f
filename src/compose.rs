//! Message templating: `{name}` and `{id}` substitution.

use crate::contacts::selection::SelectedContact;
use crate::contacts::Contact;
use crate::phone;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub const NAME_TOKEN: &str = "{name}";
pub const ID_TOKEN: &str = "{id}";

/// Substitute the contact's fields into the template.
///
/// One full pass per token, `{name}` first and then `{id}` over the result,
/// so an `{id}` carried in by a name is filled too. Unknown `{...}` tokens are
/// left untouched.
pub fn compose(template: &str, contact: &Contact) -> String {
    template
        .replace(NAME_TOKEN, &contact.name)
        .replace(ID_TOKEN, &contact.id)
}

fn placeholder_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[A-Za-z_][A-Za-z0-9_]*\}").ok())
        .as_ref()
}

/// Placeholder-looking tokens the composer will not fill, in first-seen order.
pub fn unresolved_placeholders(template: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let Some(re) = placeholder_re() else {
        return seen;
    };
    for m in re.find_iter(template) {
        let token = m.as_str();
        if token != NAME_TOKEN && token != ID_TOKEN && !seen.iter().any(|s| s == token) {
            seen.push(token.to_string());
        }
    }
    seen
}

/// A message as it would be sent, without sending it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewMessage {
    pub row: usize,
    pub name: String,
    pub phone: String,
    pub body: String,
}

/// Compose the message for every selected contact.
pub fn preview(selected: &[SelectedContact], template: &str) -> Vec<PreviewMessage> {
    selected
        .iter()
        .map(|s| PreviewMessage {
            row: s.row,
            name: s.contact.name.clone(),
            phone: phone::normalize(&s.contact.phone),
            body: compose(template, &s.contact),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asha() -> Contact {
        Contact {
            id: "7".into(),
            name: "Asha".into(),
            phone: "+919876543210".into(),
        }
    }

    #[test]
    fn test_basic_substitution() {
        assert_eq!(compose("Hi {name}, id {id}", &asha()), "Hi Asha, id 7");
    }

    #[test]
    fn test_every_occurrence() {
        assert_eq!(
            compose("{name}{name} #{id}/{id}", &asha()),
            "AshaAsha #7/7"
        );
    }

    #[test]
    fn test_no_placeholders() {
        assert_eq!(compose("Gym closed tomorrow", &asha()), "Gym closed tomorrow");
        assert_eq!(compose("", &asha()), "");
    }

    #[test]
    fn test_unknown_placeholders_left_alone() {
        assert_eq!(
            compose("Dear {Name}, {phone} {name} {", &asha()),
            "Dear {Name}, {phone} Asha {"
        );
        assert_eq!(compose("{{name}}", &asha()), "{Asha}");
    }

    #[test]
    fn test_name_pass_runs_before_id_pass() {
        let titled = Contact {
            id: "7".into(),
            name: "Mr {id}".into(),
            phone: String::new(),
        };
        assert_eq!(compose("Hi {name}", &titled), "Hi Mr 7");

        let tricky = Contact {
            id: "{name}".into(),
            name: "Mr {id}".into(),
            phone: String::new(),
        };
        assert_eq!(compose("{name} / {id}", &tricky), "Mr {name} / {name}");
    }

    #[test]
    fn test_multibyte_text() {
        let contact = Contact {
            id: "३".into(),
            name: "आशा".into(),
            phone: String::new(),
        };
        assert_eq!(compose("नमस्ते {name} 🎉 {id}", &contact), "नमस्ते आशा 🎉 ३");
    }

    #[test]
    fn test_preview() {
        let selected = vec![SelectedContact {
            row: 4,
            contact: Contact {
                id: "7".into(),
                name: "Asha".into(),
                phone: "9876543210".into(),
            },
        }];
        assert_eq!(
            preview(&selected, "Hi {name}"),
            vec![PreviewMessage {
                row: 4,
                name: "Asha".into(),
                phone: "+919876543210".into(),
                body: "Hi Asha".into(),
            }]
        );
    }

    #[test]
    fn test_unresolved_placeholders() {
        assert_eq!(
            unresolved_placeholders("Hi {name} {first_name}, {id} {date} {first_name} { x }"),
            vec!["{first_name}".to_string(), "{date}".to_string()]
        );
        assert!(unresolved_placeholders("Hi {name}").is_empty());
    }
}

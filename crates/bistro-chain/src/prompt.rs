// Chat prompt templates with `{name}` placeholders.
//
// `{{` and `}}` render as literal braces. Templates are parsed once at
// construction so a malformed template never reaches a model call.

use std::collections::HashMap;

use bistro_llm::{Message, Role};

use crate::error::PromptError;

pub type Variables = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Variable(String),
}

#[derive(Debug, Clone)]
struct MessageTemplate {
    role: Role,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    messages: Vec<MessageTemplate>,
    input_variables: Vec<String>,
}

impl PromptTemplate {
    pub fn from_messages<'a>(
        messages: impl IntoIterator<Item = (Role, &'a str)>,
    ) -> Result<Self, PromptError> {
        let mut parsed = Vec::new();
        let mut input_variables: Vec<String> = Vec::new();

        for (role, template) in messages {
            let segments = parse(template)?;
            for segment in &segments {
                if let Segment::Variable(name) = segment {
                    if !input_variables.contains(name) {
                        input_variables.push(name.clone());
                    }
                }
            }
            parsed.push(MessageTemplate { role, segments });
        }

        Ok(Self {
            messages: parsed,
            input_variables,
        })
    }

    /// Placeholder names in order of first appearance.
    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    pub fn format_messages(&self, variables: &Variables) -> Result<Vec<Message>, PromptError> {
        self.messages
            .iter()
            .map(|template| -> Result<Message, PromptError> {
                let mut text = String::new();
                for segment in &template.segments {
                    match segment {
                        Segment::Literal(s) => text.push_str(s),
                        Segment::Variable(name) => {
                            let value = variables
                                .get(name)
                                .ok_or_else(|| PromptError::MissingVariable(name.clone()))?;
                            text.push_str(value);
                        }
                    }
                }
                Ok(Message::new(template.role, text))
            })
            .collect()
    }
}

fn parse(template: &str) -> Result<Vec<Segment>, PromptError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                literal.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, '{')) | None => {
                            return Err(PromptError::Malformed {
                                position: pos,
                                reason: "unclosed placeholder",
                            })
                        }
                        Some((_, ch)) => name.push(ch),
                    }
                }
                let name = name.trim();
                if name.is_empty() {
                    return Err(PromptError::Malformed {
                        position: pos,
                        reason: "empty placeholder",
                    });
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Variable(name.to_string()));
            }
            '}' => {
                return Err(PromptError::Malformed {
                    position: pos,
                    reason: "unmatched '}'",
                })
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_renders_placeholders_per_role() {
        let prompt = PromptTemplate::from_messages([
            (Role::System, "You name restaurants."),
            (Role::User, "Name of the country is {country}."),
        ])
        .unwrap();

        let messages = prompt.format_messages(&vars(&[("country", "Mexico")])).unwrap();
        assert_eq!(
            messages,
            vec![
                Message::system("You name restaurants."),
                Message::human("Name of the country is Mexico."),
            ]
        );
    }

    #[test]
    fn test_input_variables_in_first_appearance_order() {
        let prompt = PromptTemplate::from_messages([
            (Role::System, "{b} then {a}"),
            (Role::User, "{a} and {c} and {b}"),
        ])
        .unwrap();
        assert_eq!(prompt.input_variables(), ["b", "a", "c"]);
    }

    #[test]
    fn test_double_braces_are_literal() {
        let prompt = PromptTemplate::from_messages([(Role::User, "{{\"dish\": \"{name}\"}}")]).unwrap();
        assert_eq!(prompt.input_variables(), ["name"]);
        let messages = prompt.format_messages(&vars(&[("name", "Mole")])).unwrap();
        assert_eq!(messages[0].text(), "{\"dish\": \"Mole\"}");
    }

    #[test]
    fn test_missing_variable() {
        let prompt = PromptTemplate::from_messages([(Role::User, "Hi {who}")]).unwrap();
        assert_eq!(
            prompt.format_messages(&Variables::new()),
            Err(PromptError::MissingVariable("who".into()))
        );
    }

    #[test]
    fn test_malformed_templates() {
        for bad in ["Hi {who", "Hi }", "Hi {}", "a {b{c}}"] {
            let result = PromptTemplate::from_messages([(Role::User, bad)]);
            assert!(
                matches!(result, Err(PromptError::Malformed { .. })),
                "{bad:?} should be rejected"
            );
        }
    }
}

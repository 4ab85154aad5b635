//! Tag and entity tokenizer
//!
//! Splits markup into text characters and tags. Anything that does not look
//! like a well-formed tag is kept as literal text.

/// One token of markup
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Char(char),
    Open { name: String, attributes: Vec<Attribute> },
    Close { name: String },
    /// `<name/>`
    Empty { name: String, attributes: Vec<Attribute> },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Attribute {
    pub name: String,
    pub value: String,
}

pub(crate) fn tokenize(markup: &str) -> Vec<Token> {
    let chars: Vec<char> = markup.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '<' => match chars[i + 1..].iter().position(|&c| c == '>') {
                Some(len) => {
                    let body: String = chars[i + 1..i + 1 + len].iter().collect();
                    match parse_tag(&body) {
                        Some(token) => tokens.push(token),
                        None => tokens.extend(chars[i..=i + len + 1].iter().map(|&c| Token::Char(c))),
                    }
                    i += len + 2;
                },
                None => {
                    tokens.push(Token::Char('<'));
                    i += 1;
                },
            },
            '&' => {
                let (ch, consumed) = decode_entity(&chars[i..]);
                tokens.push(Token::Char(ch));
                i += consumed;
            },
            ch => {
                tokens.push(Token::Char(ch));
                i += 1;
            },
        }
    }
    tokens
}

fn parse_tag(body: &str) -> Option<Token> {
    let body = body.trim();
    if let Some(name) = body.strip_prefix('/') {
        let name = name.trim();
        return is_tag_name(name).then(|| Token::Close {
            name: name.to_ascii_lowercase(),
        });
    }
    let (body, empty) = match body.strip_suffix('/') {
        Some(inner) => (inner.trim_end(), true),
        None => (body, false),
    };
    let name_end = body
        .find(|c: char| c.is_whitespace())
        .unwrap_or(body.len());
    let name = &body[..name_end];
    if !is_tag_name(name) {
        return None;
    }
    let attributes = parse_attributes(&body[name_end..])?;
    let name = name.to_ascii_lowercase();
    Some(if empty {
        Token::Empty { name, attributes }
    } else {
        Token::Open { name, attributes }
    })
}

fn is_tag_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// `name='value' name="value" name=value`
fn parse_attributes(input: &str) -> Option<Vec<Attribute>> {
    let chars: Vec<char> = input.chars().collect();
    let mut attributes = Vec::new();
    let mut i = 0;
    let skip_ws = |i: &mut usize| {
        while *i < chars.len() && chars[*i].is_whitespace() {
            *i += 1;
        }
    };
    loop {
        skip_ws(&mut i);
        if i >= chars.len() {
            return Some(attributes);
        }
        let start = i;
        while i < chars.len() && chars[i] != '=' && !chars[i].is_whitespace() {
            i += 1;
        }
        let name: String = chars[start..i].iter().collect();
        skip_ws(&mut i);
        if i >= chars.len() || chars[i] != '=' || name.is_empty() {
            return None;
        }
        i += 1;
        skip_ws(&mut i);
        let value: String = match chars.get(i) {
            Some(&quote) if quote == '\'' || quote == '"' => {
                let len = chars[i + 1..].iter().position(|&c| c == quote)?;
                let value = chars[i + 1..i + 1 + len].iter().collect();
                i += len + 2;
                value
            },
            Some(_) => {
                let start = i;
                while i < chars.len() && !chars[i].is_whitespace() {
                    i += 1;
                }
                chars[start..i].iter().collect()
            },
            None => return None,
        };
        attributes.push(Attribute {
            name: name.to_ascii_lowercase(),
            value,
        });
    }
}

/// Decode `&name;` at the start of `chars`; returns the character and how many
/// input characters it consumed
fn decode_entity(chars: &[char]) -> (char, usize) {
    let Some(end) = chars.iter().take(8).position(|&c| c == ';') else {
        return ('&', 1);
    };
    let name: String = chars[1..end].iter().collect();
    let decoded = match name.as_str() {
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        _ => return ('&', 1),
    };
    (decoded, end + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(tokens: &[Token]) -> String {
        tokens
            .iter()
            .filter_map(|t| match t {
                Token::Char(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_tags_and_text() {
        let tokens = tokenize("a<u>b</u>");
        assert_eq!(tokens.len(), 4);
        assert_eq!(
            tokens[1],
            Token::Open {
                name: "u".into(),
                attributes: vec![]
            }
        );
        assert_eq!(tokens[3], Token::Close { name: "u".into() });
    }

    #[test]
    fn test_attributes_with_both_quotes() {
        let tokens = tokenize("<u type='dashed' color=\"red\" height=2>");
        let Token::Open { attributes, .. } = &tokens[0] else {
            panic!("expected open tag");
        };
        let pairs: Vec<(&str, &str)> = attributes
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("type", "dashed"), ("color", "red"), ("height", "2")]
        );
    }

    #[test]
    fn test_malformed_tags_stay_literal() {
        assert_eq!(text_of(&tokenize("a < b")), "a < b");
        assert_eq!(text_of(&tokenize("1 <= 2 > 0")), "1 <= 2 > 0");
        assert_eq!(text_of(&tokenize("<u color=>x")), "<u color=>x");
    }

    #[test]
    fn test_entities() {
        assert_eq!(text_of(&tokenize("&lt;b&gt; &amp; &quot;&apos;")), "<b> & \"'");
        assert_eq!(text_of(&tokenize("fish & chips")), "fish & chips");
        assert_eq!(text_of(&tokenize("&nbsp;")), "&nbsp;");
    }

    #[test]
    fn test_empty_element() {
        assert_eq!(
            tokenize("<br/>"),
            vec![Token::Empty {
                name: "br".into(),
                attributes: vec![]
            }]
        );
    }
}

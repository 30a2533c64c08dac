//! MIME content type handling.

use std::fmt;

/// Error raised when a content type string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid content type: {0}")]
pub struct InvalidContentType(pub String);

/// MIME content type with parameters.
///
/// Parameters keep insertion order so that serialized output is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "image", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "html", "related").
    pub sub_type: String,
    /// Parameters in insertion order (e.g., charset, boundary).
    pub parameters: Vec<(String, String)>,
}

impl ContentType {
    /// Creates a new content type. Type and subtype are lowercased.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into().to_lowercase(),
            sub_type: sub_type.into().to_lowercase(),
            parameters: Vec::new(),
        }
    }

    /// Creates a text/plain content type.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain").with_parameter("charset", "utf-8")
    }

    /// Creates a text/html content type.
    #[must_use]
    pub fn text_html() -> Self {
        Self::new("text", "html").with_parameter("charset", "utf-8")
    }

    /// Adds a parameter, replacing an existing one with the same name.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self
            .parameters
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.parameters.push((name, value)),
        }
        self
    }

    /// Returns a parameter value by name (case-insensitive).
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// Returns the boundary parameter if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameter("boundary")
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("multipart")
    }

    /// The `type/subtype` pair without parameters.
    #[must_use]
    pub fn essence(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }

    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2="value 2"`. Quoted
    /// values may contain `;` and backslash-escaped characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the type/subtype pair or a parameter is
    /// malformed.
    pub fn parse(s: &str) -> Result<Self, InvalidContentType> {
        let s = s.trim();
        let (type_str, rest) = s.split_once(';').unwrap_or((s, ""));

        let (main_type, sub_type) = type_str
            .trim()
            .split_once('/')
            .ok_or_else(|| InvalidContentType(format!("missing subtype in {type_str:?}")))?;
        let main_type = main_type.trim();
        let sub_type = sub_type.trim();
        if main_type.is_empty() || sub_type.is_empty() {
            return Err(InvalidContentType(format!(
                "empty type or subtype in {type_str:?}"
            )));
        }

        let mut content_type = Self::new(main_type, sub_type);
        content_type.parameters = parse_parameters(rest)?;
        Ok(content_type)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)?;

        // Values are always quoted; output stays deterministic and legal
        // for any value, including embedded ';' and '<...>'.
        for (name, value) in &self.parameters {
            write!(f, "; {name}=\"")?;
            for ch in value.chars() {
                if ch == '"' || ch == '\\' {
                    write!(f, "\\")?;
                }
                write!(f, "{ch}")?;
            }
            write!(f, "\"")?;
        }

        Ok(())
    }
}

/// Parses a `; name=value; name="value"` parameter list, preserving order.
fn parse_parameters(input: &str) -> Result<Vec<(String, String)>, InvalidContentType> {
    let mut parameters = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while matches!(chars.peek(), Some(c) if c.is_whitespace() || *c == ';') {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }

        let mut name = String::new();
        while let Some(&c) = chars.peek() {
            if c == '=' || c == ';' {
                break;
            }
            name.push(c);
            chars.next();
        }
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Err(InvalidContentType("empty parameter name".to_string()));
        }
        if chars.next() != Some('=') {
            return Err(InvalidContentType(format!("parameter {name:?} has no value")));
        }

        while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
            chars.next();
        }

        let mut value = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => match chars.next() {
                        Some(escaped) => value.push(escaped),
                        None => {
                            return Err(InvalidContentType(format!(
                                "unterminated quoted value for {name:?}"
                            )));
                        }
                    },
                    '"' => {
                        closed = true;
                        break;
                    }
                    _ => value.push(c),
                }
            }
            if !closed {
                return Err(InvalidContentType(format!(
                    "unterminated quoted value for {name:?}"
                )));
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == ';' {
                    break;
                }
                value.push(c);
                chars.next();
            }
            value = value.trim().to_string();
        }

        parameters.push((name, value));
    }

    Ok(parameters)
}

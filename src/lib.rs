#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[cfg(test)]
#[macro_use]
extern crate named_tuple;

mod error;

pub use error::Error;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, trace};

// These are the accepted line terminators.  A line consisting of nothing
// but its terminator separates the header section from the body.
const CRLF: &str = "\r\n";
const LF: char = '\n';

// This is the character that marks a line as a folded continuation of the
// most recently opened header field.
const FOLD_MARKER: char = ' ';

fn trim_line_terminator(line: &str) -> &str {
    line.strip_suffix(CRLF)
        .or_else(|| line.strip_suffix(LF))
        .unwrap_or(line)
}

fn separate_field_name_and_value(line: &str) -> Option<Header> {
    match line.find(':') {
        None | Some(0) => None,
        Some(delimiter) => Some(Header {
            name: line[..delimiter].trim().into(),
            value: line[delimiter + 1..].trim().to_string(),
        }),
    }
}

/// The name of a message header field, as written in the input.
/// Comparisons between header names are case-insensitive.
#[derive(Debug, Default, Eq)]
pub struct HeaderName {
    name: String,
}

impl HeaderName {
    /// The canonical (lowercased) form of the name, under which all
    /// occurrences of the field are keyed.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.name.to_ascii_lowercase()
    }
}

impl std::fmt::Display for HeaderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl<T> From<T> for HeaderName
    where T: AsRef<str>
{
    fn from(name: T) -> Self {
        Self{
            name: name.as_ref().to_string(),
        }
    }
}

impl PartialEq for HeaderName {
    fn eq(&self, rhs: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&rhs.name)
    }
}

impl PartialEq<&str> for HeaderName {
    fn eq(&self, rhs: &&str) -> bool {
        self.name.eq_ignore_ascii_case(*rhs)
    }
}

impl PartialEq<HeaderName> for &str {
    fn eq(&self, rhs: &HeaderName) -> bool {
        self.eq_ignore_ascii_case(&rhs.name)
    }
}

/// One physical occurrence of a header field: the field name as written,
/// and its folded, whitespace-trimmed value.
#[derive(Debug, Default)]
pub struct Header {
    pub name: HeaderName,
    pub value: String,
}

/// One RFC 2822 message: an ordered multi-map of header fields keyed
/// case-insensitively, plus the body text, if any.
///
/// A message is built atomically by [`read`](Message::read) or
/// [`read_file`](Message::read_file) and never changes afterward.
#[derive(Debug, Default)]
pub struct Message {
    headers: HashMap<String, Vec<Header>>,
    body: Vec<String>,
}

impl Message {
    /// Parse an RFC 2822 formatted message from the given line source.
    ///
    /// Lines are read one at a time until end of input.  Header lines are
    /// collected until the first blank line; every line after it belongs
    /// to the body.  A message with no blank line is a valid header-only
    /// message.
    ///
    /// Any I/O error from the source, a continuation line with no open
    /// field, or a header line with no colon-delimited name aborts the
    /// parse; no partial message is returned.
    pub fn read<R>(mut reader: R) -> Result<Self, Error>
        where R: BufRead
    {
        let mut headers: HashMap<String, Vec<Header>> = HashMap::new();
        let mut body: Vec<String> = Vec::new();

        // The canonical key of the field opened by the last field line,
        // whose final occurrence is the target for continuation lines.
        let mut open_key: Option<String> = None;
        let mut in_body = false;
        let mut line_no = 0;
        let mut line = String::new();

        loop {
            line.clear();
            line_no += 1;
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            let content = trim_line_terminator(&line);
            if in_body {
                body.push(content.trim().to_string());
            } else if content.is_empty() {
                trace!(line_no, "blank separator; message body begins");
                in_body = true;
            } else if content.starts_with(FOLD_MARKER) {
                let open_field = open_key
                    .as_ref()
                    .and_then(|key| headers.get_mut(key))
                    .and_then(|fields| fields.last_mut());
                match open_field {
                    Some(field) => {
                        // Concatenate onto the previous value.
                        field.value = format!("{}\n {}", field.value, content.trim());
                    },
                    None => {
                        return Err(Error::NoOpenField {
                            line_no,
                            line: content.to_string(),
                        });
                    },
                }
            } else {
                match separate_field_name_and_value(content) {
                    Some(field) => {
                        let key = field.name.canonical();
                        headers.entry(key.clone()).or_default().push(field);
                        open_key = Some(key);
                    },
                    None => {
                        return Err(Error::UnparsableField {
                            line_no,
                            line: content.to_string(),
                        });
                    },
                }
            }
        }
        debug!(
            header_names = headers.len(),
            body_lines = body.len(),
            "message parsed"
        );
        Ok(Self { headers, body })
    }

    /// Parse an RFC 2822 formatted file.
    pub fn read_file<P>(path: P) -> Result<Self, Error>
        where P: AsRef<Path>
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::open_file(path, source))?;
        Self::read(BufReader::new(file))
    }

    /// Retrieve an unstructured header value by its name.
    ///
    /// Lookup is case-insensitive.  If more than one header of the given
    /// name exists, the value of the last one is returned.
    pub fn get_header<T>(&self, name: T) -> Result<&str, Error>
        where T: AsRef<str>
    {
        let name = name.as_ref();
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|fields| fields.last())
            .map(|field| field.value.as_str())
            .ok_or_else(|| Error::NotFound {
                what: format!("header '{}'", name),
            })
    }

    /// Retrieve every header with the given name, in the order they
    /// appear in the message.  Lookup is case-insensitive.
    pub fn get_headers<T>(&self, name: T) -> Result<&[Header], Error>
        where T: AsRef<str>
    {
        let name = name.as_ref();
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .ok_or_else(|| Error::NotFound {
                what: format!("header '{}'", name),
            })
    }

    /// Retrieve the message body, with the body lines joined by single
    /// spaces.
    pub fn get_body(&self) -> Result<String, Error> {
        if self.body.is_empty() {
            return Err(Error::NotFound {
                what: "message body".to_string(),
            });
        }
        Ok(self.body.join(" "))
    }

    /// Whether at least one header with the given name exists.
    #[must_use]
    pub fn has_header<T>(&self, name: T) -> bool
        where T: AsRef<str>
    {
        self.headers
            .contains_key(&name.as_ref().to_ascii_lowercase())
    }
}

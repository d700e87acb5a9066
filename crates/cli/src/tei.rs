//! Grobid TEI bibliography parsing.
//!
//! Pulls `Reference` records out of the `<biblStruct>` entries of a
//! Grobid `processReferences` TEI document. A well-formed document with
//! missing fields is not an error (the fields stay `None`); only
//! malformed XML fails.

use std::fmt;

use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use refcheck_engine::{Author, Reference};

/// TEI parse failure (malformed XML).
#[derive(Debug)]
pub struct TeiError(String);

impl fmt::Display for TeiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot parse TEI bibliography: {}", self.0)
    }
}

impl std::error::Error for TeiError {}

/// Parse every `<biblStruct>` in the document, in document order.
pub fn parse_bibliography(xml: &str) -> Result<Vec<Reference>, TeiError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut parser = BibliographyParser::default();

    loop {
        match reader.read_event().map_err(|e| TeiError(e.to_string()))? {
            Event::Start(e) => parser.handle_start(&e, false),
            Event::Empty(e) => parser.handle_start(&e, true),
            Event::Text(t) => {
                if parser.capture.is_some() {
                    let text = t.decode().map_err(|e| TeiError(e.to_string()))?;
                    if !parser.buffer.is_empty() {
                        parser.buffer.push(' ');
                    }
                    parser.buffer.push_str(&text);
                }
            }
            Event::GeneralRef(r) => {
                if parser.capture.is_some() {
                    let resolved = if let Some(ch) = r
                        .resolve_char_ref()
                        .map_err(|e| TeiError(e.to_string()))?
                    {
                        ch.to_string()
                    } else {
                        let name = r.decode().map_err(|e| TeiError(e.to_string()))?;
                        resolve_xml_entity(&name)
                            .ok_or_else(|| TeiError(format!("unrecognized entity `{}`", name)))?
                            .to_string()
                    };
                    if !parser.buffer.is_empty() {
                        parser.buffer.push(' ');
                    }
                    parser.buffer.push_str(&resolved);
                }
            }
            Event::End(e) => parser.handle_end(e.name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(parser.references)
}

/// Which element's text is currently being collected.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Capture {
    Title,
    ForenameFirst,
    ForenameMiddle,
    Surname,
    Doi,
    Volume,
    Pages,
}

#[derive(Default)]
struct AuthorBuilder {
    first: Option<String>,
    middle: Option<String>,
    family: Option<String>,
}

impl AuthorBuilder {
    fn build(self) -> Author {
        // Middle name joins the given name only when a first name exists.
        let middle = self.middle;
        let given = self.first.map(|first| match middle {
            Some(middle) => format!("{first} {middle}"),
            None => first,
        });
        Author { given, family: self.family }
    }
}

#[derive(Default)]
struct RefBuilder {
    title: Option<String>,
    authors: Vec<Author>,
    current_author: Option<AuthorBuilder>,
    doi: Option<String>,
    date: Option<String>,
    volume: Option<String>,
    pages: Option<String>,
    seen_date: bool,
}

impl RefBuilder {
    fn build(self) -> Reference {
        Reference {
            title: self.title,
            author: self.authors,
            doi: self.doi,
            url: None,
            date: self.date,
            journal: None,
            volume: self.volume,
            pages: self.pages,
        }
    }
}

#[derive(Default)]
struct BibliographyParser {
    references: Vec<Reference>,
    current: Option<RefBuilder>,
    capture: Option<Capture>,
    buffer: String,
}

impl BibliographyParser {
    fn handle_start(&mut self, e: &BytesStart, is_empty: bool) {
        if e.name().as_ref() == b"biblStruct" {
            self.current = Some(RefBuilder::default());
            self.capture = None;
            self.buffer.clear();
            return;
        }
        let Some(builder) = self.current.as_mut() else {
            return;
        };

        match e.name().as_ref() {
            b"author" if !is_empty => {
                builder.current_author = Some(AuthorBuilder::default());
            }
            b"title"
                if !is_empty
                    && builder.title.is_none()
                    && attr(e, "type").as_deref() == Some("main") =>
            {
                self.capture = Some(Capture::Title);
            }
            b"forename" if !is_empty && builder.current_author.is_some() => {
                match attr(e, "type").as_deref() {
                    Some("first") => self.capture = Some(Capture::ForenameFirst),
                    Some("middle") => self.capture = Some(Capture::ForenameMiddle),
                    _ => {}
                }
            }
            b"surname" if !is_empty && builder.current_author.is_some() => {
                self.capture = Some(Capture::Surname);
            }
            b"idno"
                if !is_empty
                    && builder.doi.is_none()
                    && attr(e, "type").as_deref() == Some("DOI") =>
            {
                self.capture = Some(Capture::Doi);
            }
            // First date element wins; the year comes from its `when`
            // attribute, so empty elements work too.
            b"date" if !builder.seen_date => {
                builder.seen_date = true;
                builder.date = attr(e, "when").as_deref().and_then(year_from_when);
            }
            b"biblScope" => match attr(e, "unit").as_deref() {
                Some("volume") if !is_empty && builder.volume.is_none() => {
                    self.capture = Some(Capture::Volume);
                }
                Some("page") if builder.pages.is_none() => {
                    match (attr(e, "from"), attr(e, "to")) {
                        (Some(from), Some(to)) => builder.pages = Some(format!("{from}-{to}")),
                        _ if !is_empty => self.capture = Some(Capture::Pages),
                        _ => {}
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn handle_end(&mut self, name: &[u8]) {
        match name {
            b"biblStruct" => {
                if let Some(builder) = self.current.take() {
                    self.references.push(builder.build());
                }
                self.capture = None;
                self.buffer.clear();
            }
            b"author" => {
                if let Some(builder) = self.current.as_mut() {
                    if let Some(author) = builder.current_author.take() {
                        builder.authors.push(author.build());
                    }
                }
                self.capture = None;
                self.buffer.clear();
            }
            _ => self.commit_capture(name),
        }
    }

    /// Commit the captured text when the capturing element closes.
    /// Closing tags of nested markup (e.g. `<hi>` inside a title) do not
    /// end the capture.
    fn commit_capture(&mut self, name: &[u8]) {
        let Some(capture) = self.capture else {
            return;
        };
        let expected: &[u8] = match capture {
            Capture::Title => b"title",
            Capture::ForenameFirst | Capture::ForenameMiddle => b"forename",
            Capture::Surname => b"surname",
            Capture::Doi => b"idno",
            Capture::Volume | Capture::Pages => b"biblScope",
        };
        if name != expected {
            return;
        }

        let text = self.buffer.trim().to_string();
        self.capture = None;
        self.buffer.clear();
        if text.is_empty() {
            return;
        }
        let Some(builder) = self.current.as_mut() else {
            return;
        };

        match capture {
            Capture::Title => builder.title = Some(text),
            Capture::Doi => builder.doi = Some(text),
            Capture::Volume => builder.volume = Some(text),
            Capture::Pages => builder.pages = Some(text),
            Capture::ForenameFirst | Capture::ForenameMiddle | Capture::Surname => {
                if let Some(author) = builder.current_author.as_mut() {
                    match capture {
                        Capture::ForenameFirst => author.first = Some(text),
                        Capture::ForenameMiddle => author.middle = Some(text),
                        _ => author.family = Some(text),
                    }
                }
            }
        }
    }
}

fn attr(e: &BytesStart, name: &str) -> Option<String> {
    e.try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok())
        .map(|value| value.into_owned())
}

/// Leading 4-digit year from a TEI `when` attribute ("2009-06-15" →
/// "2009"). Fewer than four leading digits is no year at all.
fn year_from_when(when: &str) -> Option<String> {
    let digits: String = when.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() >= 4 {
        Some(digits[..4].to_string())
    } else {
        None
    }
}

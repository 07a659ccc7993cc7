use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// One step of a [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Property(String),
    Index(usize),
}

/// The property/index chain leading to a node, used for diagnostics.
///
/// Rendered the way JSON paths are usually written: `items[0].name`, with
/// names that are not plain identifiers quoted as `['odd key']`.
///
/// # Examples
///
/// ```
/// use knot_json::error::JsonPath;
///
/// let mut path = JsonPath::new();
/// path.push_property("children");
/// path.push_index(1);
/// path.push_property("first name");
/// assert_eq!(path.to_string(), "children[1]['first name']");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    #[inline]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[inline]
    pub fn push_property(&mut self, name: impl Into<String>) {
        self.segments.push(PathSegment::Property(name.into()));
    }

    #[inline]
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    #[inline]
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '-')
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Property(name) if is_plain_name(name) => {
                    if index > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Property(name) => {
                    write!(f, "['{}']", name.replace('\'', "\\'"))?;
                }
                PathSegment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::JsonPath;

    #[test]
    fn renders_properties_and_indices() {
        let mut path = JsonPath::new();
        assert_eq!(path.to_string(), "");

        path.push_property("items");
        path.push_index(0);
        path.push_property("name");
        assert_eq!(path.to_string(), "items[0].name");

        path.pop();
        path.push_property("it's");
        assert_eq!(path.to_string(), "items[0]['it\\'s']");
    }

    #[test]
    fn leading_index() {
        let mut path = JsonPath::new();
        path.push_index(3);
        path.push_property("$id");
        assert_eq!(path.to_string(), "[3].$id");
    }
}

//! JSON path representation for locating values in nested structures.
//!
//! This module provides [`JsonPath`] and [`PathSegment`] types for building,
//! parsing and applying paths to values in nested JSON-like structures.
//!
//! A path is a typed sequence of segments, so a numeric object key (`"200"`)
//! and an array index (`[200]`) are never confused with each other.

use std::fmt::{self, Display};

use serde_json::{Map, Value};

/// A segment of a JSON path.
///
/// Paths are built from segments that represent either field access or array indexing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A field/property access (e.g., `user`, `email`)
    Field(String),
    /// An array index access (e.g., `[0]`, `[42]`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new field segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }

    fn lookup<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        match (self, value) {
            (PathSegment::Field(name), Value::Object(map)) => map.get(name),
            (PathSegment::Index(idx), Value::Array(items)) => items.get(*idx),
            (PathSegment::Index(idx), Value::Object(map)) => map.get(&idx.to_string()),
            _ => None,
        }
    }

    /// Returns the child slot for this segment, creating the container it
    /// lives in when `value` is null. Returns `None` when `value` is a scalar
    /// or a container of the wrong kind.
    fn slot<'v>(&self, value: &'v mut Value) -> Option<&'v mut Value> {
        if value.is_null() {
            *value = match self {
                PathSegment::Field(_) => Value::Object(Map::new()),
                PathSegment::Index(_) => Value::Array(Vec::new()),
            };
        }

        match (self, value) {
            (PathSegment::Field(name), Value::Object(map)) => {
                Some(map.entry(name.clone()).or_insert(Value::Null))
            }
            (PathSegment::Index(idx), Value::Array(items)) => {
                if items.len() <= *idx {
                    items.resize(*idx + 1, Value::Null);
                }
                items.get_mut(*idx)
            }
            (PathSegment::Index(idx), Value::Object(map)) => {
                Some(map.entry(idx.to_string()).or_insert(Value::Null))
            }
            _ => None,
        }
    }
}

/// A path to a value in a nested JSON-like structure.
///
/// `JsonPath` represents locations like `users[0].email` and provides
/// methods for building paths incrementally, reading through them and
/// writing through them.
///
/// # Example
///
/// ```rust
/// use autopsy::JsonPath;
///
/// let path = JsonPath::root()
///     .push_field("users")
///     .push_index(0)
///     .push_field("email");
///
/// assert_eq!(path.to_string(), "users[0].email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single field segment.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Creates a path from a single index segment.
    pub fn from_index(idx: usize) -> Self {
        Self {
            segments: vec![PathSegment::Index(idx)],
        }
    }

    /// Builds a path of field segments, one per item.
    ///
    /// ```rust
    /// use autopsy::JsonPath;
    ///
    /// let path = JsonPath::from_fields(["paths", "/users", "get"]);
    /// assert_eq!(path.len(), 3);
    /// ```
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: fields.into_iter().map(|f| PathSegment::Field(f.into())).collect(),
        }
    }

    /// Parses a JSON Pointer (`/users/0/email`) into a typed path.
    ///
    /// The pointer is interpreted against `value`: a numeric token becomes an
    /// [`PathSegment::Index`] only where the container at that point is an
    /// array. Everything else, including tokens that walk off the end of
    /// `value`, becomes a [`PathSegment::Field`]. `~1` and `~0` escapes are
    /// decoded.
    ///
    /// ```rust
    /// use autopsy::{JsonPath, PathSegment};
    /// use serde_json::json;
    ///
    /// let data = json!({"users": [{"email": 1}], "codes": {"0": true}});
    ///
    /// let path = JsonPath::from_pointer("/users/0/email", &data);
    /// assert_eq!(path.to_string(), "users[0].email");
    ///
    /// let path = JsonPath::from_pointer("/codes/0", &data);
    /// assert_eq!(path.last(), Some(&PathSegment::field("0")));
    /// ```
    pub fn from_pointer(pointer: &str, value: &Value) -> Self {
        let mut segments = Vec::new();
        let mut current = Some(value);

        let tokens = pointer.strip_prefix('/');
        for raw in tokens.into_iter().flat_map(|rest| rest.split('/')) {
            let token = raw.replace("~1", "/").replace("~0", "~");
            let segment = match (current, token.parse::<usize>()) {
                (Some(Value::Array(_)), Ok(idx)) => PathSegment::Index(idx),
                _ => PathSegment::Field(token),
            };
            current = current.and_then(|v| segment.lookup(v));
            segments.push(segment);
        }

        Self { segments }
    }

    /// Returns a new path with a field segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns a new path with all of `other`'s segments appended.
    pub fn join(&self, other: &JsonPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the parent path (all segments except the last), or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            None
        } else {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Reads the value at this path.
    ///
    /// Returns `None` when any segment is absent. A present `null` is
    /// returned as `Some(&Value::Null)`, so callers can tell the two apart.
    pub fn get<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        self.segments
            .iter()
            .try_fold(value, |current, segment| segment.lookup(current))
    }

    /// Writes `new_value` at this path, creating missing intermediate
    /// containers (objects for fields, arrays for indices).
    ///
    /// Returns `false` without touching `target` when the path has to pass
    /// through a scalar value.
    pub fn set(&self, target: &mut Value, new_value: Value) -> bool {
        let mut current = target;
        for segment in &self.segments {
            current = match segment.slot(current) {
                Some(next) => next,
                None => return false,
            };
        }
        *current = new_value;
        true
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

//! Field locator: finds the point embedded in a richer record.
//!
//! Filtering works on whole records (a JSON object carrying a `coords`
//! member, an application struct, a bare [`Point`]) and only needs the
//! position out of each one. A [`Locate`] implementation does that lookup.

use serde_json::Value;

use crate::point::Point;

/// Walk `path` from `root`, one member (or array index) at a time.
///
/// Returns `None` as soon as a step is missing. An empty path returns `root`.
pub fn object_path<'v, S: AsRef<str>>(path: &[S], root: &'v Value) -> Option<&'v Value> {
    path.iter().try_fold(root, |value, key| {
        let key = key.as_ref();
        match value {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    })
}

/// Accessor for one field below a fixed path, e.g. `name` under `person`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOf {
    path: Vec<String>,
    field: String,
}

impl FieldOf {
    pub fn new<I, S>(path: I, field: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldOf {
            path: path.into_iter().map(Into::into).collect(),
            field: field.into(),
        }
    }

    pub fn get<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        object_path(self.path.as_slice(), root).and_then(|v| v.get(self.field.as_str()))
    }
}

/// Curried form of [`FieldOf::new`].
pub fn field_of<I, S>(path: I, field: impl Into<String>) -> FieldOf
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    FieldOf::new(path, field)
}

/// Resolves the point carried by a record of type `R`.
pub trait Locate<R: ?Sized> {
    /// The record's point, or `None` if the record does not carry one.
    fn locate(&self, record: &R) -> Option<Point>;

    /// Human readable name of the lookup, used in error messages.
    fn describe(&self) -> String;
}

impl<R: ?Sized, L: Locate<R> + ?Sized> Locate<R> for &L {
    fn locate(&self, record: &R) -> Option<Point> {
        (**self).locate(record)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// The record is the point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl Locate<Point> for Identity {
    fn locate(&self, record: &Point) -> Option<Point> {
        Some(*record)
    }

    fn describe(&self) -> String {
        String::new()
    }
}

/// Member path into a JSON record; the value found there is normalised with
/// [`Point::from_json`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn new<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldPath(path.into_iter().map(Into::into).collect())
    }

    /// Split a dotted path such as `"fix.coords"`. An empty string is the empty path.
    pub fn dotted(path: &str) -> Self {
        if path.is_empty() {
            return FieldPath::default();
        }
        FieldPath::new(path.split('.'))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl Locate<Value> for FieldPath {
    fn locate(&self, record: &Value) -> Option<Point> {
        object_path(self.0.as_slice(), record).and_then(Point::from_json)
    }

    fn describe(&self) -> String {
        self.0.join(".")
    }
}

/// Caller supplied lookup closure.
pub struct FnLocator<F> {
    name: String,
    f: F,
}

impl<F> FnLocator<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        FnLocator {
            name: name.into(),
            f,
        }
    }
}

impl<R, F> Locate<R> for FnLocator<F>
where
    F: Fn(&R) -> Option<Point>,
{
    fn locate(&self, record: &R) -> Option<Point> {
        (self.f)(record)
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

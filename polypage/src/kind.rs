use std::fmt::Debug;
use std::hash::Hash;

/// A closed set of entity kinds taking part in a union.
///
/// Each kind has a stable tag. The tag is written into every union branch
/// as a literal discriminator column and parsed back with
/// [`from_tag`](EntityKind::from_tag) to route a paged row to the
/// repository and transformer of its kind.
///
/// ```
/// use polypage::EntityKind;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Kind {
///     User,
///     Post,
/// }
///
/// impl EntityKind for Kind {
///     fn tag(&self) -> &'static str {
///         match self {
///             Kind::User => "user",
///             Kind::Post => "post",
///         }
///     }
///
///     fn from_tag(tag: &str) -> Option<Self> {
///         match tag {
///             "user" => Some(Kind::User),
///             "post" => Some(Kind::Post),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(Kind::from_tag(Kind::Post.tag()), Some(Kind::Post));
/// ```
pub trait EntityKind: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// The discriminator value written for this kind.
    fn tag(&self) -> &'static str;

    /// Parses a discriminator value. Must invert [`tag`](EntityKind::tag).
    fn from_tag(tag: &str) -> Option<Self>;
}

use crate::Reflect;
use crate::ops::{ReflectMut, ReflectRef};

/// A value with named members, addressed by declaration index.
///
/// Indices follow [`ObjectInfo::members`](crate::info::ObjectInfo::members),
/// which holds the member names and attributes. Skipped fields have no index.
///
/// `#[derive(Reflect)]` implements this for structs with named fields.
///
/// # Examples
///
/// ```
/// use knot_json::derive::Reflect;
/// use knot_json::ops::Object;
///
/// #[derive(Reflect, Default)]
/// #[knot(default)]
/// struct Point {
///     x: i32,
///     y: i32,
///     #[knot(skip)]
///     cached: bool,
/// }
///
/// let mut point = Point { x: 1, y: 2, cached: false };
/// assert_eq!(point.member_len(), 2);
/// assert_eq!(point.member(1).and_then(|y| y.downcast_ref::<i32>()), Some(&2));
///
/// if let Some(x) = point.member_mut(0).and_then(|x| x.downcast_mut::<i32>()) {
///     *x = 5;
/// }
/// assert_eq!(point.x, 5);
/// ```
pub trait Object: Reflect {
    /// The member at `index`, or `None` past the last member.
    fn member(&self, index: usize) -> Option<&dyn Reflect>;

    fn member_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Number of reflected members.
    fn member_len(&self) -> usize;
}

/// Follows a chain of member indices through embedded objects.
pub fn member_at<'a>(object: &'a dyn Object, path: &[usize]) -> Option<&'a dyn Reflect> {
    let (first, rest) = path.split_first()?;
    let mut current = object.member(*first)?;
    for index in rest {
        current = match current.reflect_ref() {
            ReflectRef::Object(object) => object.member(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Mutable [`member_at`].
pub fn member_at_mut<'a>(object: &'a mut dyn Object, path: &[usize]) -> Option<&'a mut dyn Reflect> {
    let (first, rest) = path.split_first()?;
    descend(object.member_mut(*first)?, rest)
}

fn descend<'a>(value: &'a mut dyn Reflect, path: &[usize]) -> Option<&'a mut dyn Reflect> {
    let Some((first, rest)) = path.split_first() else {
        return Some(value);
    };
    match value.reflect_mut() {
        ReflectMut::Object(object) => descend(object.member_mut(*first)?, rest),
        _ => None,
    }
}

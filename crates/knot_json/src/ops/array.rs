use alloc::boxed::Box;

use crate::Reflect;

pub type ArrayIter<'a> = Box<dyn Iterator<Item = &'a dyn Reflect> + 'a>;

/// Ordered elements.
///
/// Sets implement this too; their elements cannot be reached mutably.
/// Element types are checked at runtime: [`push`](Array::push) hands back a
/// value of the wrong type instead of storing it.
///
/// Arrays that can only be built from their complete element list, such as
/// `Box<[T]>`, implement this for reading but refuse `push`.
///
/// # Examples
///
/// ```
/// use knot_json::ops::Array;
///
/// let mut values: Vec<i32> = vec![1, 2];
/// let array: &mut dyn Array = &mut values;
///
/// assert!(array.push(Box::new(3_i32)).is_ok());
/// assert!(array.push(Box::new(String::from("four"))).is_err());
///
/// let sum: i32 = array.iter().filter_map(|item| item.downcast_ref::<i32>()).sum();
/// assert_eq!(sum, 6);
/// assert_eq!(array.get(2).and_then(|item| item.downcast_ref::<i32>()), Some(&3));
/// ```
pub trait Array: Reflect {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn iter(&self) -> ArrayIter<'_>;

    /// Appends `value`, handing it back if its type is not the element type.
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    fn clear(&mut self);

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

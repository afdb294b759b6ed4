/// a vec-like structure where removes do not disturb the indices of other elements
/// basically Vec<Option<T>>
///
/// the pasture hands these indices out as ids to the spatial index,
/// so an animal taken out mid-tick must not shift anybody else.
#[derive(Debug, Clone, PartialEq)]
pub struct StableVec<T> {
    inner: Vec<Option<T>>,
}

// derived Default would want T: Default
impl<T> Default for StableVec<T> {
    fn default() -> Self {
        Self { inner: Vec::new() }
    }
}

impl<T> StableVec<T> {
    /// pushes a new element after all the others
    /// this is amortized O(1)
    /// returns its position
    pub fn push(&mut self, e: T) -> usize {
        self.inner.push(Some(e));
        self.inner.len() - 1
    }
    /// returns the element if an element existed at the position
    /// if the position was already empty, or out of bounds, returns None
    pub fn remove(&mut self, index: usize) -> Option<T> {
        self.inner.get_mut(index).and_then(Option::take)
    }
    /// puts an element back into a slot, growing the vec if needed.
    /// returns whatever was in the slot before
    pub fn put(&mut self, index: usize, e: T) -> Option<T> {
        if index >= self.inner.len() {
            self.inner.resize_with(index + 1, || None);
        }
        self.inner[index].replace(e)
    }

    /// returns refercence to element at position or none
    pub fn get(&self, index: usize) -> Option<&T> {
        self.inner.get(index).and_then(Option::as_ref)
    }
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.inner.get_mut(index).and_then(Option::as_mut)
    }

    pub fn iter_indexed(&self) -> impl Iterator<Item = (usize, &T)> {
        self.inner
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (i, e)))
    }
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.inner.iter().flatten()
    }
    /// positions of all occupied slots, in order
    pub fn indices(&self) -> Vec<usize> {
        self.iter_indexed().map(|(i, _)| i).collect()
    }
    /// this is O(n)
    pub fn len(&self) -> usize {
        self.iter().count()
    }
    pub fn is_empty(&self) -> bool {
        self.inner.iter().all(Option::is_none)
    }
}

impl<T> std::iter::Extend<T> for StableVec<T> {
    /// fills empty slots first, then pushes to the end
    fn extend<I>(&mut self, new: I)
    where
        I: IntoIterator<Item = T>,
    {
        let empties = self.inner.iter_mut().filter(|e| e.is_none());
        let mut new = new.into_iter();
        for empty in empties {
            let new = new.next();
            if new.is_some() {
                *empty = new
            } else {
                // exhausted input, we are done
                return;
            }
        }
        // exhausted empty slots, push to end
        for new in new {
            self.push(new);
        }
    }
}

impl<T> FromIterator<T> for StableVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(Some).collect(),
        }
    }
}

#[test]
fn removes_keep_indices() {
    let mut v: StableVec<char> = "abcd".chars().collect();
    assert_eq!(v.remove(1), Some('b'));
    assert_eq!(v.remove(1), None);
    assert_eq!(v.get(2), Some(&'c'));
    assert_eq!(v.indices(), vec![0, 2, 3]);
    assert_eq!(v.len(), 3);
}

#[test]
fn extend_reuses_holes_first() {
    let mut v: StableVec<u8> = [1, 2, 3].into_iter().collect();
    v.remove(0);
    v.remove(2);
    v.extend([7, 8, 9]);
    assert_eq!(v.iter_indexed().collect::<Vec<_>>(), vec![
        (0, &7),
        (1, &2),
        (2, &8),
        (3, &9)
    ]);
}

#[test]
fn put_restores_a_taken_slot() {
    let mut v: StableVec<u8> = [1, 2].into_iter().collect();
    let e = v.remove(0).unwrap();
    assert!(v.get(0).is_none());
    assert_eq!(v.put(0, e + 10), None);
    assert_eq!(v.get(0), Some(&11));
    v.put(4, 5);
    assert_eq!(v.indices(), vec![0, 1, 4]);
}

#[test]
fn default_works_for_any_element() {
    struct NoDefault(u8);
    let mut v: StableVec<NoDefault> = StableVec::default();
    assert!(v.is_empty());
    v.extend([NoDefault(3)]);
    assert_eq!(v.get(0).map(|e| e.0), Some(3));
}

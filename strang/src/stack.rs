//! The persistent stack holding the values produced by parsers.
use std::{fmt, rc::Rc};

/// A persistent last-in first-out stack.
///
/// Cloning a `Stack` is `O(1)` as clones share their nodes. This makes snapshotting a
/// [`State`][crate::State] before trying an alternative cheap, independent of how many results
/// were produced so far.
pub struct Stack<T> {
    head: Option<Rc<Node<T>>>,
    len: usize,
}

struct Node<T> {
    value: T,
    next: Option<Rc<Node<T>>>,
}

impl<T> Stack<T> {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Number of values on the stack.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the stack is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the most recently pushed value.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.head.as_ref().map(|node| &node.value)
    }

    /// Pushes a value on top of the stack.
    #[inline]
    pub fn push(&mut self, value: T) {
        let next = self.head.take();
        self.head = Some(Rc::new(Node { value, next }));
        self.len += 1;
    }

    /// Removes values from the top until at most `len` values are left.
    pub fn truncate(&mut self, len: usize) {
        while self.len > len {
            let Some(node) = self.head.take() else {
                break;
            };
            self.head = node.next.clone();
            self.len -= 1;
        }
    }

    /// Iterates over the values from the most recently pushed to the first pushed.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            node: self.head.as_deref(),
        }
    }
}

impl<T: Clone> Stack<T> {
    /// Removes and returns the most recently pushed value.
    ///
    /// The value is cloned when its node is shared with another stack.
    pub fn pop(&mut self) -> Option<T> {
        let node = self.head.take()?;
        self.len -= 1;
        match Rc::try_unwrap(node) {
            Ok(mut node) => {
                self.head = node.next.take();
                Some(node.value)
            }
            Err(node) => {
                self.head = node.next.clone();
                Some(node.value.clone())
            }
        }
    }

    /// Removes all values above the first `len` values, returning them in the order they were
    /// pushed.
    pub fn split_off(&mut self, len: usize) -> Vec<T> {
        let mut values = Vec::with_capacity(self.len.saturating_sub(len));
        while self.len > len {
            match self.pop() {
                Some(value) => values.push(value),
                None => break,
            }
        }
        values.reverse();
        values
    }

    /// Returns all values in the order they were pushed.
    pub fn into_vec(mut self) -> Vec<T> {
        self.split_off(0)
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Stack<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

impl<T> Drop for Stack<T> {
    fn drop(&mut self) {
        // Unlink uniquely owned nodes one by one instead of recursively.
        let mut next = self.head.take();
        while let Some(node) = next {
            match Rc::try_unwrap(node) {
                Ok(mut node) => next = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over the values of a [`Stack`], most recent first.
pub struct Iter<'s, T> {
    node: Option<&'s Node<T>>,
}

impl<'s, T> Iterator for Iter<'s, T> {
    type Item = &'s T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.node?;
        self.node = node.next.as_deref();
        Some(&node.value)
    }
}

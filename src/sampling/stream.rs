//! Stream building blocks shared by the samplers.
//!
//! Every sampler produces a [`ResultStream`]: a boxed, owning iterator of
//! `Result<SamplingResult>`. Errors travel through the stream as `Err` items.

use super::context::SamplingContext;
use super::result::SamplingResult;
use crate::commands::Command;
use crate::error::Result;
use std::cell::RefCell;
use std::collections::HashSet;
use std::iter;
use std::rc::Rc;

/// Lazy stream of sampling results.
pub type ResultStream = Box<dyn Iterator<Item = Result<SamplingResult>>>;

/// A stream that is built on first pull. A failed build is yielded once.
struct LazyStream<F> {
    init: Option<F>,
    stream: Option<ResultStream>,
}

impl<F> Iterator for LazyStream<F>
where
    F: FnOnce() -> Result<ResultStream>,
{
    type Item = Result<SamplingResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(init) = self.init.take() {
            match init() {
                Ok(stream) => self.stream = Some(stream),
                Err(e) => return Some(Err(e)),
            }
        }
        self.stream.as_mut()?.next()
    }
}

pub(crate) fn lazy<F>(init: F) -> ResultStream
where
    F: FnOnce() -> Result<ResultStream> + 'static,
{
    Box::new(LazyStream {
        init: Some(init),
        stream: None,
    })
}

/// Stream for `command`, created on first pull.
pub(crate) fn lazy_command(context: &SamplingContext, command: &Command) -> ResultStream {
    let context = context.clone();
    let command = command.clone();
    lazy(move || context.generator_from_command(&command))
}

pub(crate) fn once(result: SamplingResult) -> ResultStream {
    Box::new(iter::once(Ok(result)))
}

pub(crate) fn repeat(result: SamplingResult) -> ResultStream {
    Box::new(iter::repeat_with(move || Ok(result.clone())))
}

/// Drop results whose dedupe key was already emitted. Errors pass through.
pub(crate) fn dedupe(stream: ResultStream) -> ResultStream {
    let mut seen = HashSet::new();
    Box::new(stream.filter(move |item| match item {
        Ok(result) => seen.insert(result.dedupe_key().to_string()),
        Err(_) => true,
    }))
}

// ============================================================================
// Zip
// ============================================================================

/// Pulls one item from every stream per step; ends when any stream ends.
pub(crate) struct Zip {
    streams: Vec<ResultStream>,
    done: bool,
}

impl Zip {
    pub(crate) fn new(streams: Vec<ResultStream>) -> Self {
        Self {
            streams,
            done: false,
        }
    }
}

impl Iterator for Zip {
    type Item = Result<Vec<SamplingResult>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut parts = Vec::with_capacity(self.streams.len());
        for stream in &mut self.streams {
            match stream.next() {
                Some(Ok(result)) => parts.push(result),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    return None;
                }
            }
        }
        Some(Ok(parts))
    }
}

// ============================================================================
// Product
// ============================================================================

/// One factor of a [`Product`].
#[derive(Clone)]
pub(crate) enum Slot {
    /// Every rendering of a finite command.
    Finite(Rc<[SamplingResult]>),
    /// A non-finite command: pulled once per combination.
    Live(Rc<RefCell<ResultStream>>),
}

impl Slot {
    /// Materialize `command` if it is finite in `context`, else keep its
    /// stream for single pulls.
    pub(crate) fn for_command(context: &SamplingContext, command: &Command) -> Result<Slot> {
        let stream = context.generator_from_command(command)?;
        if context.is_finite(command) {
            let values = stream.collect::<Result<Vec<_>>>()?;
            Ok(Slot::Finite(values.into()))
        } else {
            Ok(Slot::Live(Rc::new(RefCell::new(stream))))
        }
    }
}

/// Cartesian product of slots, last finite slot varying fastest.
pub(crate) struct Product {
    slots: Vec<Slot>,
    indices: Vec<usize>,
    done: bool,
}

impl Product {
    pub(crate) fn new(slots: Vec<Slot>) -> Self {
        let done = slots
            .iter()
            .any(|slot| matches!(slot, Slot::Finite(values) if values.is_empty()));
        Self {
            indices: vec![0; slots.len()],
            slots,
            done,
        }
    }

    fn advance(&mut self) {
        for i in (0..self.slots.len()).rev() {
            if let Slot::Finite(values) = &self.slots[i] {
                self.indices[i] += 1;
                if self.indices[i] < values.len() {
                    return;
                }
                self.indices[i] = 0;
            }
        }
        self.done = true;
    }
}

impl Iterator for Product {
    type Item = Result<Vec<SamplingResult>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut parts = Vec::with_capacity(self.slots.len());
        for (slot, &index) in self.slots.iter().zip(&self.indices) {
            match slot {
                Slot::Finite(values) => parts.push(values[index].clone()),
                Slot::Live(stream) => {
                    let pulled = stream.borrow_mut().next();
                    match pulled {
                        Some(Ok(result)) => parts.push(result),
                        Some(Err(e)) => {
                            self.done = true;
                            return Some(Err(e));
                        }
                        None => {
                            self.done = true;
                            return None;
                        }
                    }
                }
            }
        }
        self.advance();
        Some(Ok(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finite(texts: &[&str]) -> Slot {
        Slot::Finite(texts.iter().map(|t| SamplingResult::new(*t)).collect())
    }

    fn texts(parts: Vec<SamplingResult>) -> Vec<String> {
        parts.into_iter().map(|r| r.text).collect()
    }

    #[test]
    fn test_product_row_major() {
        let product = Product::new(vec![finite(&["a", "b"]), finite(&["1", "2"])]);
        let out: Vec<Vec<String>> = product.map(|p| texts(p.unwrap())).collect();
        assert_eq!(
            out,
            vec![
                vec!["a", "1"],
                vec!["a", "2"],
                vec!["b", "1"],
                vec!["b", "2"]
            ]
        );
    }

    #[test]
    fn test_product_of_nothing_is_one_empty_combination() {
        let mut product = Product::new(Vec::new());
        assert_eq!(product.next().unwrap().unwrap(), Vec::<SamplingResult>::new());
        assert!(product.next().is_none());
    }

    #[test]
    fn test_product_with_empty_slot_is_empty() {
        let mut product = Product::new(vec![finite(&["a"]), finite(&[])]);
        assert!(product.next().is_none());
    }

    #[test]
    fn test_live_slot_pulls_once_per_combination() {
        let counter = (0..).map(|i| Ok(SamplingResult::new(i.to_string())));
        let live = Slot::Live(Rc::new(RefCell::new(Box::new(counter) as ResultStream)));
        let product = Product::new(vec![finite(&["a", "b", "c"]), live]);
        let out: Vec<Vec<String>> = product.map(|p| texts(p.unwrap())).collect();
        assert_eq!(
            out,
            vec![vec!["a", "0"], vec!["b", "1"], vec!["c", "2"]]
        );
    }

    #[test]
    fn test_zip_ends_with_shortest() {
        let a: ResultStream = repeat(SamplingResult::new("x"));
        let b: ResultStream = once(SamplingResult::new("y"));
        let out: Vec<_> = Zip::new(vec![a, b]).collect();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let items = ["ab", "a", "ab", "b", "a"].map(|t| Ok(SamplingResult::new(t)));
        let out: Vec<String> = dedupe(Box::new(items.into_iter()))
            .map(|r| r.unwrap().text)
            .collect();
        assert_eq!(out, vec!["ab", "a", "b"]);
    }

    #[test]
    fn test_lazy_stream_yields_build_error_once() {
        let mut stream = lazy(|| Err(crate::error::PromptError::unknown_variable("x")));
        assert!(matches!(stream.next(), Some(Err(_))));
        assert!(stream.next().is_none());
    }
}

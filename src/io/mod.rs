/*!
# IO

Utilities for reading and writing keyed graphs from and to plain text.

## Text Format

Every non-empty, non-comment line describes one edge instance:
```text
source<sep>target[<sep>weight][<sep>type]
```
The separator defaults to a tab. Whether the weight and type columns are present is configured
on the [`TextGraphReader`] / [`TextGraphWriter`]; a missing weight reads as
[`DEFAULT_WEIGHT`](crate::edge::DEFAULT_WEIGHT), a missing type as
[`DEFAULT_TYPE`](crate::edge::DEFAULT_TYPE).

## Traits

To generalize over reading/writing, [`GraphReader`] and [`GraphWriter`] are implemented by
readers and writers for a specific format. [`TextRead`] and [`TextWrite`] are shorthands
using the default settings.
*/

pub mod text;

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::error::Result;

pub use text::*;

/// Trait for types that can read graphs in a specific format.
///
/// This trait provides both a low-level method to read from any
/// [`BufRead`] instance and a convenience wrapper to read directly
/// from files.
pub trait GraphReader<G> {
    /// Reads a graph from the given reader according to the settings in `self`.
    ///
    /// # Errors
    /// Returns an error if the input is not a valid representation
    /// of a graph in the expected format.
    fn try_read_graph<R>(&self, reader: R) -> Result<G>
    where
        R: BufRead;

    /// Reads a graph from a file according to the settings in `self`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or if its contents
    /// are not a valid representation of a graph in the expected format.
    fn try_read_graph_file<P>(&self, path: P) -> Result<G>
    where
        P: AsRef<Path>,
    {
        self.try_read_graph(BufReader::new(File::open(path)?))
    }
}

/// Trait for types that can write graphs in a specific format.
///
/// This trait provides both a low-level method to write to any
/// [`Write`] instance and a convenience wrapper to write directly
/// to files.
pub trait GraphWriter<G> {
    /// Writes the given graph to the provided writer according to the settings in `self`.
    ///
    /// # Errors
    /// Returns an error if writing fails (e.g., IO errors).
    fn try_write_graph<W>(&self, graph: &G, writer: W) -> Result<()>
    where
        W: Write;

    /// Writes the given graph to a file according to the settings in `self`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or if writing fails.
    fn try_write_graph_file<P>(&self, graph: &G, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        self.try_write_graph(graph, BufWriter::new(File::create(path)?))
    }
}

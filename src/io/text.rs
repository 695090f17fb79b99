//! # Text
//!
//! Line based edge list with caller-chosen node identifiers. Each line `u<sep>v[<sep>w][<sep>t]`
//! adds one edge instance; unknown identifiers become new nodes in order of appearance.

use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
    str::FromStr,
};

use tracing::debug;

use super::*;
use crate::{
    edge::*,
    error::Error,
    graph::{Graph, NodeKey},
    ops::GraphEdgeOrder,
    relation::Multiplicity,
    repr::{Direction, GraphKind, Weighting},
};

/// Tries to parse the next column of a line and returns early if it is missing or malformed
macro_rules! parse_column {
    ($columns : expr, $line : expr, $name : expr) => {{
        let raw = $columns.next().map(str::trim).ok_or_else(|| Error::Parse {
            line: $line,
            reason: format!("premature end of line when parsing {}", $name),
        })?;
        raw.parse().map_err(|_| Error::Parse {
            line: $line,
            reason: format!("cannot parse {} from `{}`", $name, raw),
        })?
    }};
}

/// A GraphReader for the text edge list
#[derive(Debug, Clone)]
pub struct TextGraphReader {
    /// Column separator
    separator: char,
    /// Lines starting with `comment_identifier` are skipped when reading
    comment_identifier: Option<String>,
    /// Whether the third column holds a weight; follows the graph's weighting if unset
    read_weights: Option<bool>,
    /// Whether the column after the weight (or the third one) holds a type
    read_types: bool,
    /// Whether lines with `u == v` are kept
    self_loops: bool,
    /// Whether repeated edges of simple graphs are skipped instead of reported
    skip_duplicates: bool,
    /// Graph kind the caller expects to build
    expected_kind: Option<GraphKind>,
}

impl Default for TextGraphReader {
    fn default() -> Self {
        Self {
            separator: '\t',
            comment_identifier: Some("#".to_string()),
            read_weights: None,
            read_types: false,
            self_loops: true,
            skip_duplicates: true,
            expected_kind: None,
        }
    }
}

impl TextGraphReader {
    /// Creates a new (default) reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the column separator
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Updates the comment identifier
    pub fn comment_identifier<S: Into<String>>(mut self, c: S) -> Self {
        self.comment_identifier = Some(c.into());
        self
    }

    /// Treats every line as data
    pub fn without_comments(mut self) -> Self {
        self.comment_identifier = None;
        self
    }

    /// Whether the third column is read as weight.
    /// By default weighted graphs read it and unweighted graphs do not.
    pub fn read_weights(mut self, read_weights: bool) -> Self {
        self.read_weights = Some(read_weights);
        self
    }

    /// Whether a type column follows the weight column (or the target if weights are not read)
    pub fn read_types(mut self, read_types: bool) -> Self {
        self.read_types = read_types;
        self
    }

    /// Whether self-loops are kept (default) or silently dropped
    pub fn self_loops(mut self, self_loops: bool) -> Self {
        self.self_loops = self_loops;
        self
    }

    /// Whether a repeated edge of a simple graph is skipped (default) instead of failing the read.
    /// In undirected graphs `v u` repeats `u v`.
    pub fn skip_duplicates(mut self, skip_duplicates: bool) -> Self {
        self.skip_duplicates = skip_duplicates;
        self
    }

    /// Requires the target graph to be of the given kind
    pub fn expect_kind(mut self, kind: GraphKind) -> Self {
        self.expected_kind = Some(kind);
        self
    }

    /// Reads a graph whose nodes are fixed in advance.
    ///
    /// The graph starts with `nodes` (in this order); lines that mention any other identifier
    /// are skipped.
    pub fn try_read_graph_with_nodes<K, D, W, M, R>(
        &self,
        reader: R,
        nodes: impl IntoIterator<Item = K>,
    ) -> Result<Graph<K, D, W, M>>
    where
        K: NodeKey + FromStr,
        D: Direction,
        W: Weighting,
        M: Multiplicity,
        R: BufRead,
    {
        self.check_kind::<D, W, M>()?;
        let mut graph = Graph::with_nodes(nodes)?;
        self.fill(&mut graph, reader, false)?;
        Ok(graph)
    }

    fn check_kind<D: Direction, W: Weighting, M: Multiplicity>(&self) -> Result<()> {
        let found = GraphKind::of::<D, W, M>();
        match self.expected_kind {
            Some(expected) if expected != found => Err(Error::KindMismatch { expected, found }),
            _ => Ok(()),
        }
    }

    fn is_comment(&self, line: &str) -> bool {
        self.comment_identifier
            .as_deref()
            .is_some_and(|c| line.starts_with(c))
    }

    /// Parses a data line into `(source, target, weight, type)`
    fn parse_edge_line<K: FromStr>(
        &self,
        line: &str,
        number: usize,
        read_weights: bool,
    ) -> Result<(K, K, Weight, EdgeType)> {
        let mut columns = line.split(self.separator);

        let u: K = parse_column!(columns, number, "source node");
        let v: K = parse_column!(columns, number, "target node");
        let weight: Weight = if read_weights {
            parse_column!(columns, number, "weight")
        } else {
            DEFAULT_WEIGHT
        };
        let edge_type: EdgeType = if self.read_types {
            parse_column!(columns, number, "type")
        } else {
            DEFAULT_TYPE
        };

        Ok((u, v, weight, edge_type))
    }

    fn fill<K, D, W, M, R>(
        &self,
        graph: &mut Graph<K, D, W, M>,
        reader: R,
        insert_missing: bool,
    ) -> Result<()>
    where
        K: NodeKey + FromStr,
        D: Direction,
        W: Weighting,
        M: Multiplicity,
        R: BufRead,
    {
        let read_weights = self.read_weights.unwrap_or(W::WEIGHTED);
        let mut lines_read = 0usize;
        let mut skipped = 0usize;

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end();
            if line.is_empty() || self.is_comment(line) {
                continue;
            }
            lines_read += 1;

            let (u, v, weight, edge_type) = self.parse_edge_line::<K>(line, number + 1, read_weights)?;
            if !self.self_loops && u == v {
                skipped += 1;
                continue;
            }

            match graph.add_edge(u, v, weight, edge_type, insert_missing) {
                Ok(()) => {}
                Err(Error::PairExists { .. }) if self.skip_duplicates => skipped += 1,
                Err(Error::UnknownNode(_)) if !insert_missing => skipped += 1,
                Err(err) => return Err(err),
            }
        }

        debug!(
            lines_read,
            skipped,
            nodes = graph.node_index().len(),
            edges = graph.number_of_edges(),
            "read text graph"
        );
        Ok(())
    }
}

impl<K, D, W, M> GraphReader<Graph<K, D, W, M>> for TextGraphReader
where
    K: NodeKey + FromStr,
    D: Direction,
    W: Weighting,
    M: Multiplicity,
{
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<Graph<K, D, W, M>> {
        self.check_kind::<D, W, M>()?;
        let mut graph = Graph::new();
        self.fill(&mut graph, reader, true)?;
        Ok(graph)
    }
}

/// Trait for creating graphs from a TextGraphReader.
/// Used as shorthand for default TextGraphReader settings: tab separated, `#` comments,
/// a weight column only for weighted graphs, repeated simple edges skipped.
pub trait TextRead: Sized {
    /// Tries to read the graph from a given reader
    fn try_read_text<R: BufRead>(reader: R) -> Result<Self>;

    /// Tries to read the graph from a given file
    fn try_read_text_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_read_text(BufReader::new(File::open(path)?))
    }
}

impl<K, D, W, M> TextRead for Graph<K, D, W, M>
where
    K: NodeKey + FromStr,
    D: Direction,
    W: Weighting,
    M: Multiplicity,
{
    fn try_read_text<R: BufRead>(reader: R) -> Result<Self> {
        TextGraphReader::default().try_read_graph(reader)
    }
}

/// A writer for the text edge list
#[derive(Debug, Clone)]
pub struct TextGraphWriter {
    /// Column separator
    separator: char,
    /// Whether a weight column is written; follows the graph's weighting if unset
    write_weights: Option<bool>,
    /// Whether a type column is written
    write_types: bool,
}

impl Default for TextGraphWriter {
    fn default() -> Self {
        Self {
            separator: '\t',
            write_weights: None,
            write_types: false,
        }
    }
}

impl TextGraphWriter {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the column separator
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Whether a weight column is written
    pub fn write_weights(mut self, write_weights: bool) -> Self {
        self.write_weights = Some(write_weights);
        self
    }

    /// Whether a type column is written
    pub fn write_types(mut self, write_types: bool) -> Self {
        self.write_types = write_types;
        self
    }
}

impl<K, D, W, M> GraphWriter<Graph<K, D, W, M>> for TextGraphWriter
where
    K: NodeKey + Display,
    D: Direction,
    W: Weighting,
    M: Multiplicity,
{
    fn try_write_graph<Wr: Write>(&self, graph: &Graph<K, D, W, M>, mut writer: Wr) -> Result<()> {
        let sep = self.separator;
        let write_weights = self.write_weights.unwrap_or(W::WEIGHTED);
        let mut written = 0usize;

        for (u, v, weight, edge_type) in graph.edges() {
            write!(writer, "{u}{sep}{v}")?;
            if write_weights {
                write!(writer, "{sep}{weight}")?;
            }
            if self.write_types {
                write!(writer, "{sep}{edge_type}")?;
            }
            writeln!(writer)?;
            written += 1;
        }
        writer.flush()?;

        debug!(written, "wrote text graph");
        Ok(())
    }
}

/// Trait for writing a graph to a writer in the text edge list.
/// Shorthand for default settings.
pub trait TextWrite {
    /// Tries to write the graph to a writer
    fn try_write_text<Wr: Write>(&self, writer: Wr) -> Result<()>;

    /// Tries to write the graph to a file
    fn try_write_text_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        self.try_write_text(writer)
    }
}

impl<K, D, W, M> TextWrite for Graph<K, D, W, M>
where
    K: NodeKey + Display,
    D: Direction,
    W: Weighting,
    M: Multiplicity,
{
    fn try_write_text<Wr: Write>(&self, writer: Wr) -> Result<()> {
        TextGraphWriter::default().try_write_graph(self, writer)
    }
}

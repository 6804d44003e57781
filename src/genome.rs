//! A genome reference: the chromosome table a block validates its regions
//! against.
//!
//! A [`Genome`] is supplied externally and consumed read-only. It carries the
//! name of the assembly, a chromosome name to length lookup, and a default
//! coordinate for the assembly (the region a browser lands on when nothing
//! else is requested). Chromosome lookup is case-insensitive: the table is
//! keyed by upper-cased name, while each [`Chromosome`] retains the name as
//! originally given.

use std::collections::HashMap;

use crate::core::Chrom;
use crate::core::Position;

pub mod builder;

pub use builder::Builder;

/// A chromosome within a genome reference.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Chromosome {
    /// The chromosome name as originally given.
    name: Chrom,

    /// The chromosome length in base pairs.
    length: usize,
}

impl Chromosome {
    /// Gets the chromosome name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the chromosome length in base pairs.
    pub fn length(&self) -> usize {
        self.length
    }
}

/// The default coordinate of a genome reference.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DefaultCoord {
    /// The chromosome name.
    chrom: Chrom,

    /// The start of the default window (0-based, inclusive).
    start: Position,

    /// The stop of the default window (0-based, exclusive).
    stop: Position,
}

impl DefaultCoord {
    /// Creates a new default coordinate.
    pub fn new(chrom: impl Into<Chrom>, start: Position, stop: Position) -> DefaultCoord {
        DefaultCoord {
            chrom: chrom.into(),
            start,
            stop,
        }
    }

    /// Gets the chromosome name.
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// Gets the start of the default window.
    pub fn start(&self) -> Position {
        self.start
    }

    /// Gets the stop of the default window.
    pub fn stop(&self) -> Position {
        self.stop
    }
}

/// A genome reference.
///
/// Generally, you will want to use a [`Builder`] to construct one of these.
///
/// # Examples
///
/// ```
/// use blockview::genome::Genome;
///
/// let genome = Genome::builder()
///     .name("hg38")
///     .chromosome("chr1", 248_956_422)
///     .chromosome("chr17", 83_257_441)
///     .default_coord("chr17", 7_568_451, 7_591_984)
///     .try_build()?;
///
/// assert_eq!(genome.name(), "hg38");
/// assert_eq!(genome.chromosome("CHR17").unwrap().length(), 83_257_441);
/// assert!(genome.chromosome("chrUn").is_none());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Genome {
    /// The assembly name.
    name: String,

    /// The chromosome table, keyed by upper-cased chromosome name.
    chromosomes: HashMap<String, Chromosome>,

    /// The default coordinate for the assembly.
    default_coord: DefaultCoord,
}

impl Genome {
    /// Creates a new [`Builder`] for a genome reference.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Gets the assembly name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a chromosome by name.
    ///
    /// The lookup is case-insensitive.
    pub fn chromosome(&self, name: &str) -> Option<&Chromosome> {
        self.chromosomes.get(&name.to_uppercase())
    }

    /// Gets the number of chromosomes in the reference.
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    /// Indicates whether the reference contains no chromosomes.
    ///
    /// Note that a [`Genome`] built through the [`Builder`] always contains
    /// at least one chromosome.
    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Gets the default coordinate for the assembly.
    pub fn default_coord(&self) -> &DefaultCoord {
        &self.default_coord
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A small reference shared by the tests in this module.
    fn genome() -> Genome {
        Genome::builder()
            .name("test")
            .chromosome("chr1", 249_000_000)
            .chromosome("chrM", 16_569)
            .default_coord("chr1", 1_000_000, 1_010_000)
            .try_build()
            .unwrap()
    }

    #[test]
    fn test_chromosome_lookup_is_case_insensitive() {
        let genome = genome();

        assert_eq!(genome.chromosome("chr1").unwrap().name(), "chr1");
        assert_eq!(genome.chromosome("CHR1").unwrap().name(), "chr1");
        assert_eq!(genome.chromosome("chrm").unwrap().length(), 16_569);
        assert!(genome.chromosome("chr2").is_none());
    }

    #[test]
    fn test_default_coord_round_trips() {
        let genome = genome();

        assert_eq!(genome.default_coord().chrom(), "chr1");
        assert_eq!(genome.default_coord().start(), 1_000_000);
        assert_eq!(genome.default_coord().stop(), 1_010_000);
    }
}

//! A builder for a [`Genome`].

use std::collections::HashMap;

use crate::core::Chrom;
use crate::core::Position;
use crate::genome::Chromosome;
use crate::genome::DefaultCoord;
use crate::genome::Genome;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug, Eq, PartialEq)]
pub enum MissingError {
    /// No assembly name was provided to the [`Builder`].
    Name,

    /// No chromosomes were provided to the [`Builder`].
    Chromosomes,

    /// No default coordinate was provided to the [`Builder`].
    DefaultCoord,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Name => write!(f, "name"),
            MissingError::Chromosomes => write!(f, "chromosomes"),
            MissingError::DefaultCoord => write!(f, "default coordinate"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error related to a [`Builder`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// An error where a required field was never provided to the [`Builder`].
    Missing(MissingError),

    /// The same chromosome name (case-insensitively) was provided twice.
    DuplicateChromosome(String),

    /// A chromosome with a length of zero was provided.
    ZeroLengthChromosome(String),

    /// The default coordinate names a chromosome that is not in the table.
    UnknownDefaultChromosome(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
            Error::DuplicateChromosome(name) => {
                write!(f, "duplicate chromosome: {name}")
            }
            Error::ZeroLengthChromosome(name) => {
                write!(f, "chromosome {name} has a length of zero")
            }
            Error::UnknownDefaultChromosome(name) => {
                write!(f, "default coordinate names unknown chromosome: {name}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for a [`Genome`].
#[derive(Debug, Default)]
pub struct Builder {
    /// The assembly name.
    name: Option<String>,

    /// The chromosomes provided so far, in insertion order.
    chromosomes: Vec<(Chrom, usize)>,

    /// The default coordinate.
    default_coord: Option<DefaultCoord>,
}

impl Builder {
    /// Sets the assembly name for the [`Builder`].
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Pushes a chromosome into the [`Builder`].
    pub fn chromosome(mut self, name: impl Into<Chrom>, length: usize) -> Self {
        self.chromosomes.push((name.into(), length));
        self
    }

    /// Sets the default coordinate for the [`Builder`].
    pub fn default_coord(
        mut self,
        chrom: impl Into<Chrom>,
        start: Position,
        stop: Position,
    ) -> Self {
        self.default_coord = Some(DefaultCoord::new(chrom, start, stop));
        self
    }

    /// Consumes `self` to attempt to build a [`Genome`].
    ///
    /// # Examples
    ///
    /// ```
    /// use blockview::genome::Genome;
    /// use blockview::genome::builder;
    ///
    /// let err = Genome::builder()
    ///     .name("hg38")
    ///     .chromosome("chr1", 248_956_422)
    ///     .chromosome("CHR1", 248_956_422)
    ///     .default_coord("chr1", 0, 10_000)
    ///     .try_build()
    ///     .unwrap_err();
    ///
    /// assert!(matches!(err, builder::Error::DuplicateChromosome(_)));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<Genome> {
        let name = self.name.ok_or(Error::Missing(MissingError::Name))?;

        if self.chromosomes.is_empty() {
            return Err(Error::Missing(MissingError::Chromosomes));
        }

        let mut chromosomes = HashMap::new();

        for (chrom, length) in self.chromosomes {
            if length == 0 {
                return Err(Error::ZeroLengthChromosome(chrom));
            }

            let key = chrom.to_uppercase();
            let previous = chromosomes.insert(
                key,
                Chromosome {
                    name: chrom.clone(),
                    length,
                },
            );

            if previous.is_some() {
                return Err(Error::DuplicateChromosome(chrom));
            }
        }

        let default_coord = self
            .default_coord
            .ok_or(Error::Missing(MissingError::DefaultCoord))?;

        if !chromosomes.contains_key(&default_coord.chrom().to_uppercase()) {
            return Err(Error::UnknownDefaultChromosome(
                default_coord.chrom().to_string(),
            ));
        }

        Ok(Genome {
            name,
            chromosomes,
            default_coord,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_it_fails_to_build_when_no_name_is_provided() {
        let err = Builder::default()
            .chromosome("chr1", 100)
            .default_coord("chr1", 0, 10)
            .try_build()
            .unwrap_err();

        assert_eq!(err.to_string(), "missing required field: name");
    }

    #[test]
    fn test_it_fails_to_build_when_no_chromosomes_are_provided() {
        let err = Builder::default()
            .name("hg38")
            .default_coord("chr1", 0, 10)
            .try_build()
            .unwrap_err();

        assert_eq!(err.to_string(), "missing required field: chromosomes");
    }

    #[test]
    fn test_it_fails_to_build_when_no_default_coordinate_is_provided() {
        let err = Builder::default()
            .name("hg38")
            .chromosome("chr1", 100)
            .try_build()
            .unwrap_err();

        assert_eq!(err.to_string(), "missing required field: default coordinate");
    }

    #[test]
    fn test_it_fails_to_build_with_a_zero_length_chromosome() {
        let err = Builder::default()
            .name("hg38")
            .chromosome("chr1", 0)
            .default_coord("chr1", 0, 10)
            .try_build()
            .unwrap_err();

        assert_eq!(err, Error::ZeroLengthChromosome(String::from("chr1")));
    }

    #[test]
    fn test_it_fails_to_build_when_the_default_chromosome_is_unknown() {
        let err = Builder::default()
            .name("hg38")
            .chromosome("chr1", 100)
            .default_coord("chr2", 0, 10)
            .try_build()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "default coordinate names unknown chromosome: chr2"
        );
    }
}

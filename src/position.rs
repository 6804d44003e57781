//! Coordinate utilities: validating regions against a genome reference and
//! parsing user-typed position strings.
//!
//! Three forms of position string are accepted by [`parse_position`]:
//!
//! - A bare chromosome name (e.g., `chr17`), which resolves to a ±10,000 bp
//!   window centered on the chromosome midpoint.
//! - A coordinate (e.g., `chr17:7674220` for a single base, or
//!   `chr17:7,668,402-7,687,550` for a range; thousands separators are
//!   tolerated).
//! - An SNV-4 token (e.g., `chr17.7674220.C.T` or `chr17_7674220_C_T`),
//!   which resolves to the single base of the variant.
//!
//! Positions are 1-based unless [`Basis::ZeroBased`] is requested; the
//! internal representation is always 0-based and half-open. Parse or
//! validation failures return [`None`] rather than an error so that callers
//! can fall back to a gene-name search.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::Position;
use crate::core::Region;
use crate::genome::Genome;

/// The half-width, in base pairs, of the window produced for a bare
/// chromosome name.
const BARE_CHROM_HALF_WINDOW: usize = 10_000;

/// Matches `chr:start[-stop]` with optional thousands separators.
static COORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^:\s]+)\s*:\s*(\d[\d,]*)(?:\s*-\s*(\d[\d,]*))?\s*$").unwrap()
});

/// Matches a dot-separated SNV-4 token, `chr.pos.ref.alt`.
static SNV4_DOTTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(.+)\.(\d[\d,]*)\.([ACGTacgt]+)\.([ACGTacgt]+)\s*$").unwrap());

/// Matches an underscore-separated SNV-4 token, `chr_pos_ref_alt`.
static SNV4_UNDERSCORED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(.+)_(\d[\d,]*)_([ACGTacgt]+)_([ACGTacgt]+)\s*$").unwrap());

/// An error describing why a region is not valid against a genome reference.
#[derive(Debug, Eq, PartialEq)]
pub enum InvalidRegion {
    /// The chromosome is not present in the genome reference.
    UnknownChromosome(String),

    /// A position could not be read as a number.
    NonNumericPosition(String),

    /// The region extends past the end of the chromosome.
    OutOfRange {
        /// The offending stop position.
        stop: Position,
        /// The chromosome length.
        length: usize,
    },

    /// The start position is greater than the stop position.
    InvertedRange(Position, Position),
}

impl std::fmt::Display for InvalidRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidRegion::UnknownChromosome(name) => {
                write!(f, "unknown chromosome: {name}")
            }
            InvalidRegion::NonNumericPosition(value) => {
                write!(f, "position is not a number: {value}")
            }
            InvalidRegion::OutOfRange { stop, length } => write!(
                f,
                "position {stop} is past the end of the chromosome (length {length})"
            ),
            InvalidRegion::InvertedRange(start, stop) => {
                write!(f, "start {start} is greater than stop {stop}")
            }
        }
    }
}

impl std::error::Error for InvalidRegion {}

/// The coordinate basis of a user-supplied position string.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Basis {
    /// Positions are 1-based and ranges are fully closed (the convention of
    /// most genome browsers and of user-facing coordinates generally).
    #[default]
    OneBased,

    /// Positions are 0-based and ranges are half-open (the internal
    /// convention).
    ZeroBased,
}

/// Validates a `(chrom, start, stop)` triple against a genome reference.
///
/// Positions are 0-based and half-open. This function never panics; every
/// failure mode is a typed [`InvalidRegion`] for the caller to translate
/// into a user-facing message.
///
/// # Examples
///
/// ```
/// use blockview::genome::Genome;
/// use blockview::position;
/// use blockview::position::InvalidRegion;
///
/// let genome = Genome::builder()
///     .name("test")
///     .chromosome("chr1", 249_000_000)
///     .default_coord("chr1", 0, 10_000)
///     .try_build()?;
///
/// assert!(position::validate_region(&genome, "chr1", 100, 200).is_ok());
///
/// let err = position::validate_region(&genome, "chr9", 100, 200).unwrap_err();
/// assert!(matches!(err, InvalidRegion::UnknownChromosome(_)));
///
/// let err = position::validate_region(&genome, "chr1", 200, 100).unwrap_err();
/// assert_eq!(err, InvalidRegion::InvertedRange(200, 100));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn validate_region(
    genome: &Genome,
    chrom: &str,
    start: Position,
    stop: Position,
) -> Result<(), InvalidRegion> {
    let chromosome = genome
        .chromosome(chrom)
        .ok_or_else(|| InvalidRegion::UnknownChromosome(chrom.to_string()))?;

    if start > stop {
        return Err(InvalidRegion::InvertedRange(start, stop));
    }

    if stop > chromosome.length() {
        return Err(InvalidRegion::OutOfRange {
            stop,
            length: chromosome.length(),
        });
    }

    Ok(())
}

/// Parses a user-typed position string into a [`Region`] against a genome
/// reference.
///
/// Returns [`None`] on any parse or validation failure so callers can fall
/// back to a gene-name search. The returned region's bounds span the full
/// chromosome.
///
/// # Examples
///
/// ```
/// use blockview::genome::Genome;
/// use blockview::position;
/// use blockview::position::Basis;
///
/// let genome = Genome::builder()
///     .name("test")
///     .chromosome("chr17", 83_257_441)
///     .default_coord("chr17", 0, 10_000)
///     .try_build()?;
///
/// // A 1-based range, with thousands separators.
/// let region = position::parse_position("chr17:7,668,402-7,687,550", &genome, Basis::OneBased)
///     .unwrap();
/// assert_eq!(region.start(), 7_668_401);
/// assert_eq!(region.stop(), 7_687_550);
///
/// // An SNV-4 token resolves to its single base.
/// let region = position::parse_position("chr17.7674220.C.T", &genome, Basis::OneBased).unwrap();
/// assert_eq!((region.start(), region.stop()), (7_674_219, 7_674_220));
///
/// // Anything unparsable is `None`, not an error.
/// assert!(position::parse_position("TP53", &genome, Basis::OneBased).is_none());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_position(input: &str, genome: &Genome, basis: Basis) -> Option<Region> {
    match try_parse(input, genome, basis) {
        Ok(region) => Some(region),
        Err(reason) => {
            tracing::debug!(input, %reason, "position string did not parse");
            None
        }
    }
}

/// The fallible inner half of [`parse_position`].
fn try_parse(input: &str, genome: &Genome, basis: Basis) -> Result<Region, InvalidRegion> {
    // (1) A bare chromosome name resolves to a window centered on the
    // chromosome midpoint.
    if let Some(chromosome) = genome.chromosome(input.trim()) {
        let midpoint = chromosome.length() / 2;
        let start = midpoint.saturating_sub(BARE_CHROM_HALF_WINDOW);
        let stop = std::cmp::min(midpoint + BARE_CHROM_HALF_WINDOW, chromosome.length());

        return region(genome, chromosome.name().to_string(), start, stop);
    }

    // (2) A coordinate: `chr:pos` or `chr:start-stop`.
    if let Some(groups) = COORD.captures(input) {
        let chrom = groups.get(1).unwrap().as_str();
        let first = parse_number(groups.get(2).unwrap().as_str())?;

        let (start, stop) = match groups.get(3) {
            Some(second) => {
                let second = parse_number(second.as_str())?;
                to_half_open(first, Some(second), basis)?
            }
            None => to_half_open(first, None, basis)?,
        };

        return region(genome, chrom.to_string(), start, stop);
    }

    // (3) An SNV-4 token: `chr.pos.ref.alt` or `chr_pos_ref_alt`.
    if let Some(groups) = SNV4_DOTTED
        .captures(input)
        .or_else(|| SNV4_UNDERSCORED.captures(input))
    {
        let chrom = groups.get(1).unwrap().as_str();
        let pos = parse_number(groups.get(2).unwrap().as_str())?;
        let (start, stop) = to_half_open(pos, None, basis)?;

        return region(genome, chrom.to_string(), start, stop);
    }

    Err(InvalidRegion::NonNumericPosition(input.to_string()))
}

/// Parses a position, tolerating thousands separators.
fn parse_number(value: &str) -> Result<Position, InvalidRegion> {
    value
        .replace(',', "")
        .parse::<Position>()
        .map_err(|_| InvalidRegion::NonNumericPosition(value.to_string()))
}

/// Converts user-basis positions into the 0-based, half-open internal form.
fn to_half_open(
    first: Position,
    second: Option<Position>,
    basis: Basis,
) -> Result<(Position, Position), InvalidRegion> {
    match basis {
        Basis::OneBased => {
            // 1-based positions start at one.
            let start = first
                .checked_sub(1)
                .ok_or(InvalidRegion::NonNumericPosition(String::from("0")))?;

            match second {
                Some(stop) => Ok((start, stop)),
                None => Ok((start, first)),
            }
        }
        Basis::ZeroBased => match second {
            Some(stop) => Ok((first, stop)),
            None => Ok((first, first + 1)),
        },
    }
}

/// Validates the parsed window and assembles a [`Region`] whose bounds span
/// the full chromosome.
fn region(
    genome: &Genome,
    chrom: String,
    start: Position,
    stop: Position,
) -> Result<Region, InvalidRegion> {
    validate_region(genome, &chrom, start, stop)?;

    // SAFETY: the window was just validated against the chromosome bounds.
    let chromosome = genome.chromosome(&chrom).unwrap();
    Ok(Region::try_new(chromosome.name(), 0, chromosome.length(), start, stop).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A small reference shared by the tests in this module.
    fn genome() -> Genome {
        Genome::builder()
            .name("test")
            .chromosome("chr1", 249_000_000)
            .chromosome("chr17", 83_257_441)
            .chromosome("chrM", 16_569)
            .default_coord("chr1", 1_000_000, 1_010_000)
            .try_build()
            .unwrap()
    }

    #[test]
    fn test_validate_rejects_each_failure_mode() {
        let genome = genome();

        assert_eq!(
            validate_region(&genome, "chr9", 0, 10).unwrap_err(),
            InvalidRegion::UnknownChromosome(String::from("chr9"))
        );
        assert_eq!(
            validate_region(&genome, "chrM", 100, 20_000).unwrap_err(),
            InvalidRegion::OutOfRange {
                stop: 20_000,
                length: 16_569
            }
        );
        assert_eq!(
            validate_region(&genome, "chr1", 200, 100).unwrap_err(),
            InvalidRegion::InvertedRange(200, 100)
        );
        assert!(validate_region(&genome, "chr1", 100, 100).is_ok());
    }

    #[test]
    fn test_it_parses_a_bare_chromosome_name() {
        let genome = genome();

        // chrM is shorter than the ±10,000 bp window, so both edges clamp.
        let region = parse_position("chrM", &genome, Basis::OneBased).unwrap();
        assert_eq!(region.chrom(), "chrM");
        assert_eq!(region.start(), 0);
        assert_eq!(region.stop(), 16_569);
        assert_eq!(region.bound_stop(), 16_569);

        let region = parse_position("chr17", &genome, Basis::OneBased).unwrap();
        let midpoint = 83_257_441 / 2;
        assert_eq!(region.start(), midpoint - 10_000);
        assert_eq!(region.stop(), midpoint + 10_000);
    }

    #[test]
    fn test_it_parses_a_single_base_coordinate() {
        let genome = genome();

        let region = parse_position("chr17:7674220", &genome, Basis::OneBased).unwrap();
        assert_eq!((region.start(), region.stop()), (7_674_219, 7_674_220));

        let region = parse_position("chr17:7674220", &genome, Basis::ZeroBased).unwrap();
        assert_eq!((region.start(), region.stop()), (7_674_220, 7_674_221));
    }

    #[test]
    fn test_it_parses_a_range_with_separators_and_whitespace() {
        let genome = genome();

        let region =
            parse_position(" chr17 : 7,668,402 - 7,687,550 ", &genome, Basis::OneBased).unwrap();

        assert_eq!(region.chrom(), "chr17");
        assert_eq!(region.start(), 7_668_401);
        assert_eq!(region.stop(), 7_687_550);
    }

    #[test]
    fn test_it_parses_snv4_tokens_in_both_notations() {
        let genome = genome();

        let dotted = parse_position("chr17.7674220.C.T", &genome, Basis::OneBased).unwrap();
        let underscored = parse_position("chr17_7674220_C_T", &genome, Basis::OneBased).unwrap();

        assert_eq!(dotted, underscored);
        assert_eq!((dotted.start(), dotted.stop()), (7_674_219, 7_674_220));
    }

    #[test]
    fn test_failures_return_none_rather_than_panicking() {
        let genome = genome();

        // Unknown chromosome.
        assert!(parse_position("chr9:100-200", &genome, Basis::OneBased).is_none());
        // Inverted range.
        assert!(parse_position("chr1:500-100", &genome, Basis::OneBased).is_none());
        // Past the end of the chromosome.
        assert!(parse_position("chrM:1-90000", &genome, Basis::OneBased).is_none());
        // Gene symbols fall through to the caller's search flow.
        assert!(parse_position("TP53", &genome, Basis::OneBased).is_none());
        // A 1-based position of zero does not exist.
        assert!(parse_position("chr1:0", &genome, Basis::OneBased).is_none());
    }
}

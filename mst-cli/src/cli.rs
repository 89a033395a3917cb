//! Command-line surface: `mst <infile> <outfile> <alpha>`.

use std::path::PathBuf;

use clap::Parser;

/// Computes the minimum spanning tree of a weighted undirected graph using
/// a distributed Boruvka algorithm over a tree of in-process workers.
#[derive(Debug, Parser)]
#[command(name = "mst", about = "Distributed Boruvka MST over a worker tree")]
pub struct Cli {
    /// Input graph: one edge per line, `u v w` whitespace-separated integers.
    pub infile: PathBuf,

    /// Output path. MST edges are appended, sorted by `(w, u, v)` per batch.
    pub outfile: PathBuf,

    /// Leaf chunk-size exponent in `[0, 1]`: `chunk_size = ceil(|V|^alpha)`.
    #[arg(value_parser = parse_alpha)]
    pub alpha: f64,
}

/// Parses and validates the `alpha` argument, rejecting anything outside
/// `[0.0, 1.0]` at parse time rather than deep inside the tree builder.
fn parse_alpha(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a valid floating-point number"))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("alpha must be in [0, 1], got {value}"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundary_values() {
        assert_eq!(parse_alpha("0").unwrap(), 0.0);
        assert_eq!(parse_alpha("1").unwrap(), 1.0);
        assert_eq!(parse_alpha("0.5").unwrap(), 0.5);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(parse_alpha("-0.1").is_err());
        assert!(parse_alpha("1.1").is_err());
    }

    #[test]
    fn rejects_non_numeric_values() {
        assert!(parse_alpha("abc").is_err());
    }

    #[test]
    fn cli_parses_three_positional_arguments() {
        let cli = Cli::parse_from(["mst", "in.txt", "out.txt", "0.5"]);
        assert_eq!(cli.infile, PathBuf::from("in.txt"));
        assert_eq!(cli.outfile, PathBuf::from("out.txt"));
        assert_eq!(cli.alpha, 0.5);
    }
}

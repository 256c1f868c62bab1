//! Line-oriented edge-list parsing.

use std::io::BufRead;

use kgbench_core::VertexId;

use crate::errors::EdgeListError;

/// Delimiter used when none is given.
pub const DEFAULT_DELIMITER: char = ',';

const COMMENT: char = '#';

pub(crate) fn validate_delimiter(delimiter: char) -> Result<(), EdgeListError> {
    if delimiter.is_whitespace() || delimiter == COMMENT {
        return Err(EdgeListError::InvalidDelimiter { delimiter });
    }
    Ok(())
}

/// Reads one edge per non-blank, non-comment line.
pub(crate) fn read_edges<R: BufRead>(
    reader: R,
    delimiter: char,
) -> Result<Vec<Vec<VertexId>>, EdgeListError> {
    validate_delimiter(delimiter)?;
    let mut edges = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT) {
            continue;
        }
        edges.push(parse_edge(trimmed, delimiter, index + 1)?);
    }
    Ok(edges)
}

fn parse_edge(line: &str, delimiter: char, number: usize) -> Result<Vec<VertexId>, EdgeListError> {
    line.split(delimiter)
        .enumerate()
        .map(|(slot, raw)| {
            let endpoint = raw.trim();
            if endpoint.is_empty() {
                Err(EdgeListError::EmptyEndpoint { line: number, slot })
            } else {
                Ok(VertexId::from(endpoint))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ids(raw: &[&str]) -> Vec<VertexId> {
        raw.iter().copied().map(VertexId::from).collect()
    }

    #[test]
    fn skips_blanks_and_comments() {
        let edges = read_edges("# header\n\n a , b \n  # note\nc,c,d\r\n".as_bytes(), ',')
            .expect("input is well formed");
        assert_eq!(edges, vec![ids(&["a", "b"]), ids(&["c", "c", "d"])]);
    }

    #[test]
    fn honours_custom_delimiters() {
        let edges = read_edges("a;b\nb;c\n".as_bytes(), ';').expect("input is well formed");
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[1], ids(&["b", "c"]));
    }

    #[rstest]
    #[case("a,,b", 1, 1)]
    #[case("x,y\n,z", 2, 0)]
    #[case("p,q\nr,s,", 2, 2)]
    fn reports_empty_endpoints(#[case] raw: &str, #[case] line: usize, #[case] slot: usize) {
        let err = read_edges(raw.as_bytes(), ',').expect_err("empty endpoint must fail");
        assert!(matches!(
            err,
            EdgeListError::EmptyEndpoint { line: l, slot: s } if l == line && s == slot
        ));
    }

    #[rstest]
    #[case(' ')]
    #[case('\t')]
    #[case('#')]
    fn rejects_unusable_delimiters(#[case] delimiter: char) {
        assert!(matches!(
            read_edges("a b".as_bytes(), delimiter),
            Err(EdgeListError::InvalidDelimiter { .. })
        ));
    }
}

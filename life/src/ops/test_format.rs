// macros make formatting nicer

/// rows of '.'s (dead) and 'o's (alive), see `from_test_format`
#[macro_export]
macro_rules! test_cells {
    {$s:literal} => {
        $crate::from_test_format($s)
    };
}
pub use test_cells;

/// Parses whitespace separated rows of '.'s (dead) and 'o's (alive).
///
/// First line may be empty, leading/trailing spaces are ignored.
/// This has very little error handling, rows should all be the same length.
pub fn from_test_format(s: &str) -> Vec<Vec<bool>> {
    s.split_ascii_whitespace()
        .map(|row| row.bytes().map(parse_cell).collect())
        .collect()
}
fn parse_cell(b: u8) -> bool {
    match b {
        b'.' => false,
        b'o' => true,
        _ => panic!("Invalid byte {b:02x}"),
    }
}

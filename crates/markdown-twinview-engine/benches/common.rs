// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with some content.\n\n- Bullet point\n  - Nested item\n- Another item\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n| Name | Qty |\n|---|---|\n| apple | 3 |\n\n";
    base.repeat(size)
}

/// Byte offset of the `nth` occurrence of `needle` plus `offset`.
#[allow(dead_code)]
pub fn offset_of(content: &str, needle: &str, nth: usize, offset: usize) -> usize {
    content
        .match_indices(needle)
        .nth(nth)
        .map(|(i, _)| i + offset)
        .unwrap_or(0)
}

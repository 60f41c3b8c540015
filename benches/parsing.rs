//! Performance benchmarks for litmark
//!
//! Run with: cargo bench

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use litmark::{InlineSet, Options, Parser};

/// Sample documents of various sizes
mod samples {
    pub const TINY: &str = "Hello, *world*!";

    pub const SMALL: &str = r#"# Heading

This is a paragraph with *emphasis* and **strong** text.

- Item 1
- Item 2
- Item 3

`inline code` and [a link](https://example.com).
"#;

    pub const OFFICE: &str = r#"## Morning Prayer

[V] O Lord, open my lips.
[R] And my mouth shall declare your praise.

[red]The hymn follows.[/red]

Blessed be the Lord [*] the God of Israel [+]
he has come to his people [t] and set them free.

[II] Let us pray to the Lord.
[I1] For the Church throughout the world,
[I2] that it may be one.
[IR] Lord, hear our prayer.
"#;

    /// Generate a large document by repeating sections
    pub fn large() -> String {
        let section = r#"
## Section Title

This paragraph contains various inline elements like *emphasis*, **strong**,
`code`, ~~struck~~ and [links](https://example.com), plus http://example.org.

- First bullet point with **bold** text
- Second bullet point with *italic* text
  - A nested point

> A blockquote that spans
> multiple lines.

    indented code
    block

| a | b |
|---|:-:|
| 1 | 2 |

"#;
        section.repeat(50)
    }

    /// Many potential emphasis openers with no closers
    pub fn pathological_emphasis() -> String {
        "*a ".repeat(1000)
    }

    /// Openers whose walk ends at a star run that is not a group
    pub fn pathological_star_runs() -> String {
        "*a**b".repeat(5000)
    }

    /// Colons that look like URL schemes, with one real URL at the end
    pub fn pathological_colons() -> String {
        "x://y ".repeat(5000) + "http://z.com"
    }

    /// Quotes nested past the expansion limit
    pub fn pathological_nested() -> String {
        "> ".repeat(100) + "deep\n"
    }
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    group.throughput(Throughput::Bytes(samples::TINY.len() as u64));
    group.bench_function("tiny", |b| b.iter(|| litmark::to_html(black_box(samples::TINY))));

    group.throughput(Throughput::Bytes(samples::SMALL.len() as u64));
    group.bench_function("small", |b| b.iter(|| litmark::to_html(black_box(samples::SMALL))));

    let large = samples::large();
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("large", |b| b.iter(|| litmark::to_html(black_box(&large))));

    let liturgical = Parser::with_options(Options {
        liturgical_elements: true,
        ..Options::default()
    });
    group.throughput(Throughput::Bytes(samples::OFFICE.len() as u64));
    group.bench_function("office", |b| b.iter(|| liturgical.text(black_box(samples::OFFICE))));

    group.finish();
}

fn bench_phases(c: &mut Criterion) {
    let mut group = c.benchmark_group("phases");
    let parser = Parser::new();
    let large = samples::large();
    group.throughput(Throughput::Bytes(large.len() as u64));

    group.bench_function("block_only", |b| b.iter(|| parser.parse(black_box(&large))));

    let document = parser.parse(&large);
    group.bench_function("render_only", |b| b.iter(|| parser.render(black_box(&document))));

    let line = "Some *emphasis*, `code`, [a link](/x) and &amp; entities ".repeat(20);
    group.throughput(Throughput::Bytes(line.len() as u64));
    group.bench_function("inline_line", |b| b.iter(|| parser.line(black_box(&line), InlineSet::EMPTY)));

    group.finish();
}

fn bench_escaping(c: &mut Criterion) {
    let mut group = c.benchmark_group("escaping");

    let plain = "Hello, this is plain text without any special characters. ".repeat(100);
    group.throughput(Throughput::Bytes(plain.len() as u64));
    group.bench_function("plain_text", |b| {
        b.iter(|| {
            let mut out = String::with_capacity(plain.len());
            litmark::escape::escape_text_into(&mut out, black_box(&plain));
            out
        })
    });

    let html_heavy = "<script>alert('xss')</script> & more <tags> here! ".repeat(100);
    group.throughput(Throughput::Bytes(html_heavy.len() as u64));
    group.bench_function("html_heavy", |b| {
        b.iter(|| {
            let mut out = String::with_capacity(html_heavy.len() * 2);
            litmark::escape::escape_text_into(&mut out, black_box(&html_heavy));
            out
        })
    });

    group.finish();
}

fn bench_pathological(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathological");
    group.sample_size(20);

    let emphasis = samples::pathological_emphasis();
    group.throughput(Throughput::Bytes(emphasis.len() as u64));
    group.bench_function("unclosed_emphasis", |b| b.iter(|| litmark::to_html(black_box(&emphasis))));

    let star_runs = samples::pathological_star_runs();
    group.throughput(Throughput::Bytes(star_runs.len() as u64));
    group.bench_function("star_runs", |b| b.iter(|| litmark::to_html(black_box(&star_runs))));

    let colons = samples::pathological_colons();
    group.throughput(Throughput::Bytes(colons.len() as u64));
    group.bench_function("scheme_colons", |b| b.iter(|| litmark::to_html(black_box(&colons))));

    let nested = samples::pathological_nested();
    group.throughput(Throughput::Bytes(nested.len() as u64));
    group.bench_function("deep_nesting", |b| b.iter(|| litmark::to_html(black_box(&nested))));

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_phases, bench_escaping, bench_pathological);
criterion_main!(benches);

//! litmark CLI: converts a document from a file or stdin to HTML.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::Parser as _;
use litmark::{InlineSet, Options, Parser};

#[derive(clap::Parser)]
#[command(name = "litmark", version)]
#[command(about = "Convert Markdown with liturgical annotations to HTML")]
struct Cli {
    /// Input file; stdin when absent or `-`
    file: Option<PathBuf>,

    /// Only break lines that end in two or more spaces
    #[arg(long)]
    no_breaks: bool,

    /// Pass raw HTML through instead of escaping it
    #[arg(long)]
    allow_markup: bool,

    /// Leave bare URLs unlinked
    #[arg(long)]
    no_urls: bool,

    /// Require a space after the `#` run of a header
    #[arg(long)]
    strict: bool,

    /// Escape raw markup and neutralize unknown URL schemes
    #[arg(long)]
    safe: bool,

    /// Recognize liturgical blocks and symbols
    #[arg(long)]
    liturgical: bool,

    /// Emit liturgical symbols without wrapping elements
    #[arg(long)]
    bare_liturgy: bool,

    /// Drop every "alleluia" from the text
    #[arg(long)]
    suppress_alleluia: bool,

    /// Reserved footnote switch, accepted for compatibility
    #[arg(long)]
    footnotes: bool,

    /// Response text configured for intercessions
    #[arg(long, value_name = "TEXT")]
    intercession_response: Option<String>,

    /// Treat the input as a single line of inline markup
    #[arg(long)]
    inline: bool,

    /// Fail instead of degrading documents that nest too deeply
    #[arg(long)]
    strict_nesting: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            breaks_enabled: !self.no_breaks,
            markup_escaped: !self.allow_markup,
            urls_linked: !self.no_urls,
            strict_mode: self.strict,
            safe_mode: self.safe,
            liturgical_elements: self.liturgical,
            liturgical_markup: !self.bare_liturgy,
            suppress_alleluia: self.suppress_alleluia,
            footnotes_enabled: self.footnotes,
            intercession_response: self.intercession_response.clone(),
        }
    }
}

fn read_input(file: Option<&PathBuf>) -> io::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let input = read_input(cli.file.as_ref())?;
    let parser = Parser::with_options(cli.options());
    log::debug!("converting {} bytes", input.len());

    let html = if cli.inline {
        parser.line(&input, InlineSet::EMPTY)
    } else if cli.strict_nesting {
        parser.try_text(&input).map_err(io::Error::other)?
    } else {
        parser.text(&input)
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(html.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}

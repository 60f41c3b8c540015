//! Liturgical annotation tests: responsory and intercession blocks,
//! inline symbols, red text, line decorations and the alleluia filter.

use litmark::{Options, Parser, to_html, to_html_with_options};

fn wrapped() -> Options {
    Options {
        liturgical_elements: true,
        ..Options::default()
    }
}

fn bare() -> Options {
    Options {
        liturgical_markup: false,
        ..wrapped()
    }
}

// === Blocks ===

#[test]
fn versicle_and_response() {
    let _ = env_logger::builder().is_test(true).try_init();
    assert_eq!(
        to_html_with_options("[V] O Lord, open my lips.\n[R] And my mouth shall declare your praise.", &wrapped()),
        "<p class=\"versicle\"><span class=\"symbol-versicle\">&#8483;</span> O Lord, open my lips.</p>\n\
         <p class=\"response\"><span class=\"symbol-response\">&#8479;</span> And my mouth shall declare your praise.</p>"
    );
}

#[test]
fn bare_responsory_symbols() {
    assert_eq!(
        to_html_with_options("[R] Thanks be to God.", &bare()),
        "<p>&#8479; Thanks be to God.</p>"
    );
}

#[test]
fn empty_versicle_has_only_the_symbol() {
    assert_eq!(
        to_html_with_options("[V]", &wrapped()),
        "<p class=\"versicle\"><span class=\"symbol-versicle\">&#8483;</span></p>"
    );
}

#[test]
fn intercession_blocks() {
    assert_eq!(
        to_html_with_options(
            "[II] Let us pray.\n[I1] For the Church,\n[I2] that it may be one.\n[IR] Lord, hear our prayer.",
            &wrapped()
        ),
        "<p class=\"intercession-intro\">Let us pray.</p>\n\
         <p class=\"intention-part1\">For the Church,</p>\n\
         <p class=\"intention-part2\">that it may be one.</p>\n\
         <p class=\"intercession-response\">Lord, hear our prayer.</p>"
    );
}

#[test]
fn block_content_is_inline_scanned() {
    assert_eq!(
        to_html_with_options("[I1] For *all* people", &bare()),
        "<p>For <em>all</em> people</p>"
    );
}

#[test]
fn liturgical_block_ends_paragraph() {
    assert_eq!(
        to_html_with_options("Intro\n[V] x", &wrapped()),
        "<p>Intro</p>\n<p class=\"versicle\"><span class=\"symbol-versicle\">&#8483;</span> x</p>"
    );
}

#[test]
fn marker_needs_following_space() {
    assert_eq!(to_html_with_options("[V]x", &wrapped()), "<p>[V]x</p>");
}

#[test]
fn disabled_by_default() {
    assert_eq!(to_html("[V] x"), "<p>[V] x</p>");
    assert_eq!(to_html("a [+] b _c_"), "<p>a [+] b _c_</p>");
}

#[test]
fn intercession_response_is_not_inserted() {
    let parser = Parser::with_options(Options {
        intercession_response: Some("Hear us.".into()),
        ..wrapped()
    });
    assert_eq!(parser.intercession_response(), Some("Hear us."));
    let html = parser.text("[II] Let us pray.\n[I1] For peace.");
    assert!(!html.contains("Hear us."));
}

// === Inline symbols ===

#[test]
fn inline_symbols_wrapped() {
    assert_eq!(
        to_html_with_options("Glory [+] to God [*] for ever [t]", &wrapped()),
        "<p>Glory <span class=\"symbol-cross\">&#10011;</span> to God \
         <span class=\"symbol-star\">*</span> for ever <span class=\"symbol-dagger\">&#8224;</span></p>"
    );
}

#[test]
fn inline_symbols_bare() {
    assert_eq!(
        to_html_with_options("a [+] b [*] c [t]", &bare()),
        "<p>a &#10011; b * c &#8224;</p>"
    );
}

#[test]
fn defined_reference_wins_over_symbol() {
    assert_eq!(
        to_html_with_options("[+]: /cross\n\nsee [+]", &wrapped()),
        "<p>see <a href=\"/cross\">+</a></p>"
    );
}

#[test]
fn symbols_survive_safe_mode() {
    let options = Options {
        safe_mode: true,
        ..wrapped()
    };
    assert_eq!(
        to_html_with_options("[V] x [t]", &options),
        "<p class=\"versicle\"><span class=\"symbol-versicle\">&#8483;</span> x \
         <span class=\"symbol-dagger\">&#8224;</span></p>"
    );
}

// === Red text and line decorations ===

#[test]
fn red_text() {
    assert_eq!(
        to_html_with_options("[red]Kneel.[/red] All pray", &wrapped()),
        "<p><span class=\"color-red\">Kneel.</span> All pray</p>"
    );
    assert_eq!(to_html_with_options("[red]Kneel.", &wrapped()), "<p>[red]Kneel.</p>");
}

#[test]
fn red_text_is_not_scanned() {
    assert_eq!(
        to_html_with_options("[red]*a* & b[/red]", &wrapped()),
        "<p><span class=\"color-red\">*a* &amp; b</span></p>"
    );
}

#[test]
fn under_and_overlines() {
    assert_eq!(
        to_html_with_options("_sung_ and ‾said‾", &wrapped()),
        "<p><span class=\"text-underline\">sung</span> and <span class=\"text-overline\">said</span></p>"
    );
    assert_eq!(
        to_html_with_options("_‾both‾_", &wrapped()),
        "<p><span class=\"text-overline text-underline\">both</span></p>"
    );
    assert_eq!(
        to_html_with_options("_sung_", &bare()),
        "<p>sung</p>"
    );
}

// === Alleluia filter ===

#[test]
fn alleluia_suppressed() {
    let options = Options {
        suppress_alleluia: true,
        ..Options::default()
    };
    assert_eq!(
        to_html_with_options("Praise the Lord, alleluia.", &options),
        "<p>Praise the Lord,</p>"
    );
    assert_eq!(
        to_html_with_options("# Christ is risen, alleluia, alleluia", &options),
        "<h1>Christ is risen,</h1>"
    );
    assert_eq!(to_html("Alleluia!"), "<p>Alleluia!</p>");
}

//! Rendering grammars to the rule-based XML dialect transports consume.

use crate::error::GrammarError;
use crate::grammar::{Grammar, Item, Node};
use parley_types::markup::render;
use parley_types::InputMode;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

const GRAMMAR_NAMESPACE: &str = "http://www.w3.org/2001/06/grammar";

/// Renders a grammar as a GRXML-style document.
pub fn to_xml(grammar: &Grammar) -> Result<String, GrammarError> {
    render(|w| write_grammar(w, grammar)).map_err(GrammarError::from)
}

fn write_grammar<W: Write>(w: &mut Writer<W>, grammar: &Grammar) -> quick_xml::Result<()> {
    let mut start = BytesStart::new("grammar").with_attributes([
        ("xmlns", GRAMMAR_NAMESPACE),
        ("version", "1.0"),
        ("mode", mode_attr(grammar.mode)),
        ("root", grammar.root.as_str()),
    ]);
    if let Some(language) = &grammar.language {
        start.push_attribute(("xml:lang", language.as_str()));
    }
    if let Some(tag_format) = &grammar.tag_format {
        start.push_attribute(("tag-format", tag_format.as_str()));
    }
    w.write_event(Event::Start(start))?;

    for rule in &grammar.rules {
        w.write_event(Event::Start(BytesStart::new("rule").with_attributes([
            ("id", rule.id.as_str()),
            ("scope", rule.scope.as_str()),
        ])))?;
        write_nodes(w, &rule.body)?;
        w.write_event(Event::End(BytesEnd::new("rule")))?;
    }

    w.write_event(Event::End(BytesEnd::new("grammar")))?;
    Ok(())
}

// The document dialect only distinguishes keypad and voice grammars.
fn mode_attr(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Dtmf => "dtmf",
        InputMode::Speech | InputMode::Any => "voice",
    }
}

fn write_nodes<W: Write>(w: &mut Writer<W>, nodes: &[Node]) -> quick_xml::Result<()> {
    for node in nodes {
        match node {
            Node::Text(text) => w.write_event(Event::Text(BytesText::new(text)))?,
            Node::Tag(tag) => {
                w.write_event(Event::Start(BytesStart::new("tag")))?;
                w.write_event(Event::Text(BytesText::new(tag)))?;
                w.write_event(Event::End(BytesEnd::new("tag")))?;
            }
            Node::Item(item) => write_item(w, item)?,
            Node::OneOf(items) => {
                w.write_event(Event::Start(BytesStart::new("one-of")))?;
                for item in items {
                    write_item(w, item)?;
                }
                w.write_event(Event::End(BytesEnd::new("one-of")))?;
            }
        }
    }
    Ok(())
}

fn write_item<W: Write>(w: &mut Writer<W>, item: &Item) -> quick_xml::Result<()> {
    let mut start = BytesStart::new("item");
    if let Some(repeat) = &item.repeat {
        start.push_attribute(("repeat", repeat.to_string().as_str()));
    }
    w.write_event(Event::Start(start))?;
    write_nodes(w, &item.body)?;
    w.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

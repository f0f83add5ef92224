// src/proto/codec.rs
//! Connection-string codec.
//!
//! Every kind is described by a small token table; [`encode`] and [`decode`]
//! walk that table instead of carrying one branch per kind. Neither function
//! fails: a string with missing separators decodes to a descriptor with the
//! affected fields left blank.

use super::descriptor::ConnectionDescriptor;
use super::kind::{Field, StreamKind};

/// Fixed target the bluetooth bridge listens on.
pub const BLUETOOTH_TARGET: &str = "localhost:8143";

/// Serial framing the receiver expects after the baudrate.
pub const SERIAL_FRAMING: &str = ":8:n:1:off";

#[derive(Debug, Clone, Copy)]
enum Token {
    Field(Field),
    /// Always written; a missing separator ends decoding.
    Sep(char),
    /// Written verbatim, ignored when reading.
    Tail(&'static str),
    /// Never written; when reading, everything from this char on is dropped.
    Qualifier(char),
    /// Written only if one of its fields is set, read only if its closing
    /// separator is present.
    Group(&'static [Token]),
}

impl Token {
    /// Character that ends a field placed right before this token.
    fn stop_char(&self) -> Option<char> {
        match self {
            Token::Sep(c) | Token::Qualifier(c) => Some(*c),
            Token::Tail(s) => s.chars().next(),
            Token::Field(_) | Token::Group(_) => None,
        }
    }
}

/* ---------- grammar tables ---------- */

const SERIAL: &[Token] = &[
    Token::Field(Field::Device),
    Token::Sep(':'),
    Token::Field(Field::Baudrate),
    Token::Tail(SERIAL_FRAMING),
];
const FILE: &[Token] = &[Token::Field(Field::Path)];
const TCPCLI: &[Token] = &[
    Token::Field(Field::Address),
    Token::Sep(':'),
    Token::Field(Field::Port),
];
const TCPSVR: &[Token] = &[Token::Sep(':'), Token::Field(Field::Port)];
const CREDENTIALS: &[Token] = &[
    Token::Field(Field::Username),
    Token::Sep(':'),
    Token::Field(Field::Password),
    Token::Sep('@'),
];
const NTRIP: &[Token] = &[
    Token::Group(CREDENTIALS),
    Token::Field(Field::Address),
    Token::Sep(':'),
    Token::Field(Field::Port),
    Token::Sep('/'),
    Token::Field(Field::Mount),
    Token::Qualifier(':'),
];
const ADDRESS: &[Token] = &[Token::Field(Field::Address)];
const BLUETOOTH: &[Token] = &[Token::Tail(BLUETOOTH_TARGET)];

fn grammar(kind: StreamKind) -> &'static [Token] {
    match kind {
        StreamKind::Off => &[],
        StreamKind::Serial => SERIAL,
        StreamKind::File => FILE,
        StreamKind::TcpClient => TCPCLI,
        StreamKind::TcpServer => TCPSVR,
        StreamKind::NtripClient | StreamKind::NtripServer => NTRIP,
        StreamKind::Ftp | StreamKind::Http => ADDRESS,
        StreamKind::Bluetooth => BLUETOOTH,
    }
}

/// Flatten a descriptor into its single-line connection string.
pub fn encode(desc: &ConnectionDescriptor) -> String {
    let mut out = String::new();
    write_tokens(&mut out, grammar(desc.kind), desc);
    out
}

/// Recover a descriptor of `kind` from a connection string. Best effort.
pub fn decode(kind: StreamKind, s: &str) -> ConnectionDescriptor {
    let mut desc = ConnectionDescriptor::new(kind);
    let mut rest = s.trim();
    read_tokens(grammar(kind), &mut rest, &mut desc);
    desc
}

/* ---------- helpers ---------- */

fn write_tokens(out: &mut String, tokens: &[Token], desc: &ConnectionDescriptor) {
    for token in tokens {
        match *token {
            Token::Field(f) => out.push_str(&clean(desc.get(f))),
            Token::Sep(c) => out.push(c),
            Token::Tail(s) => out.push_str(s),
            Token::Qualifier(_) => {}
            Token::Group(inner) => {
                if group_is_set(inner, desc) {
                    write_tokens(out, inner, desc);
                }
            }
        }
    }
}

fn group_is_set(tokens: &[Token], desc: &ConnectionDescriptor) -> bool {
    tokens
        .iter()
        .any(|t| matches!(t, Token::Field(f) if !clean(desc.get(*f)).is_empty()))
}

fn clean(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .collect()
}

/// Separator characters of the tokens after `i`, with their index.
fn stops_after(tokens: &[Token], i: usize) -> impl Iterator<Item = (usize, char)> + '_ {
    tokens
        .iter()
        .enumerate()
        .skip(i + 1)
        .filter_map(|(k, t)| t.stop_char().map(|c| (k, c)))
}

/// A field ends at the first separator of the rest of the sequence that is
/// present, so a missing separator only blanks the fields it guards.
/// Returns false when the input stops matching; later fields stay blank.
fn read_tokens(tokens: &[Token], rest: &mut &str, desc: &mut ConnectionDescriptor) -> bool {
    let mut i = 0;
    while i < tokens.len() {
        let cur: &str = *rest;
        match tokens[i] {
            Token::Field(f) => {
                // the closing separator of a sequence is matched from the right
                let closing = i + 2 == tokens.len() && matches!(tokens[i + 1], Token::Sep(_));
                let at = stops_after(tokens, i)
                    .filter_map(|(k, c)| {
                        if closing && k == i + 1 { cur.rfind(c) } else { cur.find(c) }
                    })
                    .min();
                let (value, tail) = match at {
                    Some(at) => cur.split_at(at),
                    None => (cur, ""),
                };
                desc.set(f, value);
                *rest = tail;
            }
            Token::Sep(c) => match cur.strip_prefix(c) {
                Some(tail) => *rest = tail,
                None => {
                    // skip ahead to the separator the input continues with
                    let first = cur.chars().next();
                    match stops_after(tokens, i).find(|&(_, s)| Some(s) == first) {
                        Some((k, _)) => {
                            i = k;
                            continue;
                        }
                        None => return false,
                    }
                }
            },
            Token::Tail(_) | Token::Qualifier(_) => {
                *rest = "";
                return true;
            }
            Token::Group(inner) => {
                if let Some(at) = group_end(inner, &tokens[i + 1..], cur) {
                    let (mut head, tail) = cur.split_at(at);
                    read_tokens(inner, &mut head, desc);
                    *rest = tail;
                }
            }
        }
        i += 1;
    }
    true
}

/// Byte offset just past the group's closing separator, if the group is present.
///
/// The closing char is searched from the right but not past the first
/// separator of the following tokens, so it may repeat inside the group
/// without being taken from the fields after it.
fn group_end(inner: &[Token], following: &[Token], cur: &str) -> Option<usize> {
    let close = inner.last().and_then(Token::stop_char)?;
    let first = cur.find(close)?;
    let after = first + close.len_utf8();
    let bound = following
        .iter()
        .filter_map(Token::stop_char)
        .filter_map(|c| cur[after..].find(c))
        .min()
        .map_or(cur.len(), |at| after + at);
    let at = cur[..bound].rfind(close)?;
    Some(at + close.len_utf8())
}

/* ---------- tests ---------- */

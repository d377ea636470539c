//! End-to-end grammar scenarios: expectation, recovery, and recursion.

use pretty_assertions::assert_eq;

use glint_diagnostic::{DiagnosticQueue, ErrorCode, Severity};
use glint_ir::{Attr, AttrKind, RuleId, Span, TokenCapture};

use super::{id, lp, num, rp, run, stream, ID, LP, NUM, RP, SEMI};
use crate::{eoi, skip_past, terminal, Cursor, KindSet, Outcome, RuleSet};

fn unwrap_selector(attr: &Attr) -> (usize, &Attr) {
    match &attr.kind {
        AttrKind::Selector { selected, inner } => (*selected, inner),
        other => panic!("expected selector attribute, got {other:?}"),
    }
}

fn queuer_children(attr: &Attr) -> &[Attr] {
    match &attr.kind {
        AttrKind::Queuer(children) => children,
        other => panic!("expected queuer attribute, got {other:?}"),
    }
}

#[test]
fn simple_terminal_sequence() {
    // identifier, then end of input.
    let grammar = id() >> eoi();
    let tokens = stream(&[(ID, "x")]);
    let (parsed, pos, _) = run(&grammar, &tokens);

    assert_eq!(parsed.outcome, Outcome::Succeed);
    assert_eq!(pos, 1);

    let attr = parsed.attr.unwrap();
    let children = queuer_children(&attr);
    assert_eq!(children.len(), 2);
    assert!(matches!(children[0].kind, AttrKind::Terminal(Some(_))));
    assert!(matches!(children[1].kind, AttrKind::Terminal(None)));
    // Root spans all consumed input.
    assert_eq!(attr.span(&tokens), Some(Span::new(0, 1)));
}

#[test]
fn alternation_selects_matching_branch() {
    let grammar = id() | num();
    let tokens = stream(&[(NUM, "3")]);
    let (parsed, _, _) = run(&grammar, &tokens);

    assert_eq!(parsed.outcome, Outcome::Succeed);
    let attr = parsed.attr.unwrap();
    let (selected, inner) = unwrap_selector(&attr);
    assert_eq!(selected, 1);
    assert!(matches!(inner.kind, AttrKind::Terminal(Some(_))));
}

#[test]
fn repetition_collects_each_match() {
    let grammar = id().many0() >> eoi();
    let tokens = stream(&[(ID, "a"), (ID, "b"), (ID, "c")]);
    let (parsed, pos, _) = run(&grammar, &tokens);

    assert_eq!(parsed.outcome, Outcome::Succeed);
    assert_eq!(pos, 3);

    let attr = parsed.attr.unwrap();
    let children = queuer_children(&attr);
    match &children[0].kind {
        AttrKind::Sequence(items) => assert_eq!(items.len(), 3),
        other => panic!("expected sequence attribute, got {other:?}"),
    }
}

#[test]
fn expectation_failure_commits_and_reports() {
    // `(` > identifier > `)` over `( 3`: committed after the `(`.
    let grammar = lp().then_expect(id()).then_expect(rp());
    let tokens = stream(&[(LP, "("), (NUM, "3")]);
    let (parsed, pos, mut diags) = run(&grammar, &tokens);

    assert_eq!(parsed.outcome, Outcome::ExpectedFailed);
    // Cursor left at the offending token.
    assert_eq!(pos, 1);

    let flushed = diags.flush();
    assert_eq!(flushed.len(), 1);
    assert_eq!(flushed[0].code, ErrorCode::E1002);
    assert_eq!(flushed[0].primary_span(), Some(Span::new(1, 2)));
}

#[test]
fn recovery_resumes_after_committed_failure() {
    // The handler skips past the `)` so the tail of the grammar still runs.
    let group = lp().then_expect(id()).then_expect(rp());
    let grammar = group.catch(skip_past(KindSet::new(&[RP]))) >> eoi();
    let tokens = stream(&[(LP, "("), (NUM, "3"), (RP, ")")]);
    let (parsed, pos, mut diags) = run(&grammar, &tokens);

    assert_eq!(parsed.outcome, Outcome::RecoveredExpectedFailed);
    assert!(parsed.is_continuable());
    assert_eq!(pos, 3);

    // The placeholder child covers the skipped region.
    let attr = parsed.attr.unwrap();
    let children = queuer_children(&attr);
    assert_eq!(children[0].capture, TokenCapture::new(0, 3));

    let flushed = diags.flush();
    assert_eq!(flushed.len(), 1);
    assert_eq!(flushed[0].code, ErrorCode::E1002);
}

#[test]
fn recursive_grammar_nests_attributes() {
    // expr := number | `(` expr `)`
    let mut rules = RuleSet::new();
    let expr = rules.declare("expr");
    expr.define(num() | (lp() >> expr.parser() >> rp()));

    let tokens = stream(&[(LP, "("), (LP, "("), (NUM, "3"), (RP, ")"), (RP, ")")]);
    let mut diags = DiagnosticQueue::new();
    let parsed = crate::parse(&expr, &tokens, &mut diags);

    assert_eq!(parsed.outcome, Outcome::Succeed);
    assert_eq!(diags.error_count(), 0);

    // Outer: ( ( 3 ) )
    let outer = parsed.attr.unwrap();
    assert_eq!(outer.rule, Some(RuleId(0)));
    assert_eq!(outer.capture, TokenCapture::new(0, 5));
    let (selected, outer_group) = unwrap_selector(&outer);
    assert_eq!(selected, 1);

    // Middle: ( 3 )
    let middle = &queuer_children(outer_group)[1];
    assert_eq!(middle.rule, Some(RuleId(0)));
    assert_eq!(middle.capture, TokenCapture::new(1, 4));
    let (selected, middle_group) = unwrap_selector(middle);
    assert_eq!(selected, 1);

    // Innermost: 3
    let innermost = &queuer_children(middle_group)[1];
    let (selected, leaf) = unwrap_selector(innermost);
    assert_eq!(selected, 0);
    assert!(matches!(leaf.kind, AttrKind::Terminal(Some(_))));
}

#[test]
fn mutually_recursive_rules() {
    // stmt := identifier `;` | block      block := `(` stmt* `)`
    let mut rules = RuleSet::new();
    let stmt = rules.declare("stmt");
    let block = rules.declare("block");
    let semi = terminal(SEMI, "`;`");
    stmt.define((id() >> semi) | block.parser());
    block.define(lp() >> stmt.parser().many0() >> rp());

    let tokens = stream(&[
        (LP, "("),
        (ID, "a"),
        (SEMI, ";"),
        (LP, "("),
        (RP, ")"),
        (RP, ")"),
    ]);
    let mut diags = DiagnosticQueue::new();
    let parsed = crate::parse(&block, &tokens, &mut diags);

    assert_eq!(parsed.outcome, Outcome::Succeed);
    assert_eq!(parsed.attr.unwrap().rule, block.id());
}

#[test]
fn statement_list_recovers_per_statement() {
    // stmt := (identifier > `;`) with per-statement recovery; a bad
    // statement is skipped and the rest still parse.
    let semi_set = KindSet::new(&[SEMI]);
    let stmt = || {
        let semi = terminal(SEMI, "`;`");
        id().then_expect(semi).catch(skip_past(semi_set.clone()))
    };
    let grammar = stmt().many0() >> eoi();

    let tokens = stream(&[
        (ID, "a"),
        (SEMI, ";"),
        (ID, "b"),
        (NUM, "3"),
        (SEMI, ";"),
        (ID, "c"),
        (SEMI, ";"),
    ]);
    let (parsed, pos, diags) = run(&grammar, &tokens);

    assert_eq!(parsed.outcome, Outcome::Succeed);
    assert_eq!(pos, 7);
    assert_eq!(diags.error_count(), 1);

    let attr = parsed.attr.unwrap();
    let stmts = queuer_children(&attr)[0].children();
    assert_eq!(stmts.len(), 3);
}

#[test]
fn top_level_parse_warns_on_leftover_input() {
    let mut rules = RuleSet::new();
    let atom = rules.declare("atom");
    atom.define(id());

    let tokens = stream(&[(ID, "x"), (NUM, "3")]);
    let mut diags = DiagnosticQueue::new();
    let parsed = crate::parse(&atom, &tokens, &mut diags);

    assert_eq!(parsed.outcome, Outcome::Succeed);
    assert_eq!(diags.error_count(), 0);
    let flushed = diags.flush();
    assert_eq!(flushed.len(), 1);
    assert_eq!(flushed[0].code, ErrorCode::E1004);
    assert_eq!(flushed[0].severity, Severity::Warning);
}

#[test]
fn cursor_never_moves_backwards_overall() {
    // Continuable results leave the cursor at or past the entry position.
    let grammar = (id() | num()).many0();
    let tokens = stream(&[(ID, "a"), (NUM, "1"), (ID, "b")]);
    let mut cursor = Cursor::new(&tokens);
    let mut diags = DiagnosticQueue::new();
    let entry = cursor.position();
    let parsed = grammar.parse(&mut cursor, &mut diags);

    assert!(parsed.is_continuable());
    assert!(cursor.position() >= entry);
    assert_eq!(cursor.position(), 3);
}

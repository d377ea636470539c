//! Named rules with late-bound bodies.
//!
//! Rules make recursive grammars expressible: a rule may be declared
//! first, referenced from sub-expressions (its own body included), and
//! defined afterwards. Grammar code owns rules through [`Rule`] handles
//! (or a [`RuleSet`] registry); embedded references are weak, which is
//! what breaks the ownership cycle of a recursive grammar.
//!
//! A rule body may be reassigned; parses started afterwards use the
//! latest assignment. Bodies are read-only while a parse is running.

use std::cell::RefCell;
use std::rc::Rc;

use glint_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use glint_ir::RuleId;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::combinator::{Parser, ParserKind};
use crate::cursor::Cursor;
use crate::outcome::Parsed;

/// Shared state of one named rule.
pub(crate) struct RuleCell {
    id: Option<RuleId>,
    name: String,
    body: RefCell<Option<Parser>>,
}

impl RuleCell {
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Run the rule body, then stamp the rule id and token range onto the
    /// produced attribute.
    pub(crate) fn parse(&self, cursor: &mut Cursor<'_>, diags: &mut DiagnosticQueue) -> Parsed {
        let body = self.body.borrow();
        let Some(body) = body.as_ref() else {
            diags.add(
                Diagnostic::error(ErrorCode::E1003)
                    .with_message(format!(
                        "rule `{}` is referenced but never defined",
                        self.name
                    ))
                    .with_label(cursor.current_span(), "while parsing here"),
            );
            return Parsed::failed();
        };

        trace!(rule = %self.name, pos = cursor.position(), "rule enter");
        let start = cursor.start_capture();
        let mut parsed = body.parse(cursor, diags);
        if parsed.outcome.is_continuable() {
            if let Some(attr) = parsed.attr.as_mut() {
                if self.id.is_some() {
                    attr.rule = self.id;
                }
                attr.capture = cursor.complete_capture(start);
            }
        }
        trace!(
            rule = %self.name,
            outcome = ?parsed.outcome,
            pos = cursor.position(),
            "rule exit"
        );
        parsed
    }
}

/// Owning handle to a named rule.
///
/// Cloning a `Rule` clones the handle, never the rule: all clones share
/// one cell, so defining through any of them affects every reference.
#[derive(Clone)]
pub struct Rule {
    cell: Rc<RuleCell>,
}

impl Rule {
    /// Declare an anonymous-id rule (its attributes stay unstamped).
    pub fn new(name: impl Into<String>) -> Self {
        Rule {
            cell: Rc::new(RuleCell {
                id: None,
                name: name.into(),
                body: RefCell::new(None),
            }),
        }
    }

    /// Declare a rule that stamps `id` onto the attributes it produces.
    pub fn with_id(name: impl Into<String>, id: RuleId) -> Self {
        Rule {
            cell: Rc::new(RuleCell {
                id: Some(id),
                name: name.into(),
                body: RefCell::new(None),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.cell.name
    }

    pub fn id(&self) -> Option<RuleId> {
        self.cell.id
    }

    /// Assign (or reassign) the rule body. The latest assignment wins for
    /// subsequent parses.
    pub fn define(&self, body: Parser) {
        *self.cell.body.borrow_mut() = Some(body);
    }

    pub fn is_defined(&self) -> bool {
        self.cell.body.borrow().is_some()
    }

    /// A parser node referencing this rule without owning it.
    ///
    /// Embed this in sub-expressions (including the rule's own body) to
    /// form recursive grammars.
    pub fn parser(&self) -> Parser {
        Parser::new(ParserKind::RuleRef {
            rule: Rc::downgrade(&self.cell),
        })
    }

    /// Run this rule at the cursor.
    pub fn parse(&self, cursor: &mut Cursor<'_>, diags: &mut DiagnosticQueue) -> Parsed {
        self.cell.parse(cursor, diags)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rule<{}>", self.cell.name)
    }
}

/// Registry owning a grammar's rules.
///
/// Allocates ids in declaration order and resolves them back to names for
/// diagnostics. Declaring an existing name returns the existing handle,
/// which is how forward declarations for mutual recursion work.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    by_name: FxHashMap<String, RuleId>,
}

impl RuleSet {
    pub fn new() -> Self {
        RuleSet::default()
    }

    /// Declare a rule, or fetch the handle declared earlier under the
    /// same name.
    pub fn declare(&mut self, name: &str) -> Rule {
        if let Some(&id) = self.by_name.get(name) {
            return self.rules[id.0 as usize].clone();
        }
        let id = RuleId(self.rules.len() as u32);
        let rule = Rule::with_id(name, id);
        self.by_name.insert(name.to_string(), id);
        self.rules.push(rule.clone());
        rule
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.by_name
            .get(name)
            .map(|id| &self.rules[id.0 as usize])
    }

    pub fn name_of(&self, id: RuleId) -> Option<&str> {
        self.rules.get(id.0 as usize).map(Rule::name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }
}

//! Rule-by-rule explanation of a resolution.
//!
//! Runs the same pass as [`resolve`](super::resolve) but records, for every
//! rule, whether its predicate held and what its effect did.

use std::fmt::Write as _;

use crate::core::context::TargetContext;
use crate::core::declaration::{ModuleDeclaration, Rule};
use crate::core::descriptor::BuildDescriptor;
use crate::resolver::errors::ResolutionError;
use crate::resolver::resolve::{Outcome, Pass};

/// Trace of one rule.
#[derive(Debug, Clone)]
pub struct RuleTrace<'a> {
    /// Position in the declaration's rule list
    pub index: usize,
    pub rule: &'a Rule,
    /// `None` when the predicate did not hold
    pub outcome: Option<Outcome>,
}

impl RuleTrace<'_> {
    pub fn applied(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Full explanation of one resolution.
#[derive(Debug, Clone)]
pub struct Explanation<'a> {
    pub context: TargetContext,
    pub steps: Vec<RuleTrace<'a>>,
    pub result: Result<BuildDescriptor, ResolutionError>,
}

impl Explanation<'_> {
    /// Number of rules whose predicate held.
    pub fn applied_count(&self) -> usize {
        self.steps.iter().filter(|s| s.applied()).count()
    }

    /// Render as human-readable text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Rules under {}:", self.context);

        if self.steps.is_empty() {
            let _ = writeln!(out, "  (no conditional rules)");
        }

        for step in &self.steps {
            match &step.outcome {
                Some(outcome) => {
                    let _ = writeln!(
                        out,
                        "  [{:>3}] applied  {}    # {}",
                        step.index, step.rule, outcome
                    );
                }
                None => {
                    let _ = writeln!(out, "  [{:>3}] skipped  {}", step.index, step.rule);
                }
            }
        }

        match &self.result {
            Ok(desc) => {
                let _ = writeln!(
                    out,
                    "# {} of {} rules applied, fingerprint {}",
                    self.applied_count(),
                    self.steps.len(),
                    desc.fingerprint()
                );
            }
            Err(err) => {
                let _ = writeln!(out, "# resolution failed: {}", err);
            }
        }

        out
    }
}

/// Resolve while recording a trace of every rule.
pub fn explain<'a>(declaration: &'a ModuleDeclaration, context: &TargetContext) -> Explanation<'a> {
    let mut pass = Pass::seed(declaration);
    let mut steps = Vec::with_capacity(declaration.conditional_rules.len());

    for (index, rule) in declaration.conditional_rules.iter().enumerate() {
        let outcome = if rule.predicate.holds(context) {
            Some(pass.apply(&rule.effect))
        } else {
            None
        };
        steps.push(RuleTrace {
            index,
            rule,
            outcome,
        });
    }

    Explanation {
        context: context.clone(),
        steps,
        result: pass.finish(),
    }
}

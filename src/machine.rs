use crate::error::ExecFailure;
use crate::term::Term;
use crate::util::Log;

/// A small-step rewriter over a single [`Term`].
///
/// Holds three stacks: `code` (remaining instructions), `data` (values
/// produced so far) and `sink` (an append-only residual prefix the machine
/// has given up reducing). `code` and `data` are LIFO; `sink` only grows.
pub struct Machine {
    code: Vec<Term>,
    data: Vec<Term>,
    sink: Vec<Term>,
    debug: Log<&'static str>,
    steps: usize,
}

impl Machine {
    /// Load `root` as the sole instruction to run.
    pub fn new(root: Term) -> Self {
        Self {
            code: vec![root],
            data: Vec::new(),
            sink: Vec::new(),
            debug: Log::None,
            steps: 0,
        }
    }

    /// Enable the per-step trace (printed at [`Log::Verbose`] or above,
    /// debug builds only).
    pub fn set_log(&mut self, level: Log<&'static str>) {
        self.debug = level;
    }

    pub fn has_next(&self) -> bool {
        !self.code.is_empty()
    }

    /// Reconstruct the current term as `sink ++ data ++ reverse(code)`.
    pub fn value(&self) -> Term {
        let xs = self
            .sink
            .iter()
            .cloned()
            .chain(self.data.iter().cloned())
            .chain(self.code.iter().rev().cloned())
            .collect();
        Term::from_array(xs)
    }

    /// Run one rewrite step. Panics if [`Machine::has_next`] is false —
    /// callers must check before stepping, exactly as the code stack never
    /// empties mid-loop while `normalize` gates on `has_next`.
    pub fn step(&mut self) {
        let p = self.code.pop().expect("Machine::step called with empty code");
        self.steps += 1;

        match p {
            Term::Identity => {
                self.debug.trace_step(self.steps, "identity, no-op");
            }
            Term::Catenate(fst, snd) => {
                self.debug.trace_step(self.steps, "catenate: split into fst, snd");
                self.code.push((*snd).clone());
                self.code.push((*fst).clone());
            }
            Term::Quote(_) => {
                self.debug.trace_step(self.steps, "quote: push onto data");
                self.data.push(p);
            }
            Term::Variable(_) => {
                self.debug.trace_step(self.steps, "variable: thunk");
                self.thunk(p);
            }
            Term::Annotate(_) => {
                self.debug.trace_step(self.steps, "annotate: inert, discarded");
            }
            Term::Constant(c) => match self.try_exec(c) {
                Ok(()) => self.debug.trace_step(self.steps, "constant: executed"),
                Err(_) => {
                    self.debug.trace_step(self.steps, "constant: failed, thunk");
                    self.thunk(p);
                }
            },
        }
    }

    /// Commit the current data stack to the sink and append `point`, the
    /// term reduction gave up on. Once committed those values can no longer
    /// be consumed by later primitives.
    fn thunk(&mut self, point: Term) {
        self.sink.append(&mut self.data);
        self.sink.push(point);
    }

    fn peek(&self, index: usize) -> Result<&Term, ExecFailure> {
        if index >= self.data.len() {
            return Err(ExecFailure::NoMoreData);
        }
        Ok(&self.data[self.data.len() - 1 - index])
    }

    fn pop(&mut self) -> Result<Term, ExecFailure> {
        self.data.pop().ok_or(ExecFailure::NoMoreData)
    }

    fn require_quote(t: &Term) -> Result<&Term, ExecFailure> {
        t.as_quote().ok_or(ExecFailure::WrongTag)
    }

    /// Dispatch a primitive letter against the data stack. Returns
    /// `Err(ExecFailure)` without mutating `self.data` if the required
    /// arguments are missing or of the wrong shape; `step` turns that into
    /// a thunk.
    fn try_exec(&mut self, letter: char) -> Result<(), ExecFailure> {
        match letter {
            'a' => {
                Self::require_quote(self.peek(0)?)?;
                let value = self.pop()?;
                let Term::Quote(body) = value else {
                    unreachable!("checked by require_quote above")
                };
                self.code.push((*body).clone());
                Ok(())
            }
            'b' => {
                let value = self.pop()?;
                self.data.push(value.quote());
                Ok(())
            }
            'c' => {
                Self::require_quote(self.peek(0)?)?;
                Self::require_quote(self.peek(1)?)?;
                let snd = self.pop()?;
                let fst = self.pop()?;
                let (Term::Quote(fst_body), Term::Quote(snd_body)) = (fst, snd) else {
                    unreachable!("checked by require_quote above")
                };
                let composed = (*fst_body).clone().seq((*snd_body).clone()).quote();
                self.data.push(composed);
                Ok(())
            }
            'd' => {
                let top = self.peek(0)?.clone();
                self.data.push(top);
                Ok(())
            }
            'e' => {
                self.pop()?;
                Ok(())
            }
            'f' => {
                self.peek(1)?;
                let top = self.pop()?;
                let second = self.pop()?;
                self.data.push(top);
                self.data.push(second);
                Ok(())
            }
            'g' | 'h' => Ok(()),
            // `Term::constant` is an unconstrained public constructor, so a
            // caller can build a letter outside `a..h` directly (bypassing
            // `parse`, which is the only thing that restricts it). Treat it
            // like any other primitive failure rather than panicking, so
            // `normalize` stays total.
            _ => Err(ExecFailure::WrongTag),
        }
    }
}

/// Load `term` into a fresh [`Machine`] and step until quiescent.
///
/// Total: any condition the machine can't resolve becomes a residual in the
/// returned [`Term`] rather than an error. Termination is not guaranteed —
/// `[t] a` for a self-reproducing `t` diverges; use
/// [`normalize_bounded`] for a caller-imposed step limit.
pub fn normalize(term: Term) -> Term {
    let mut machine = Machine::new(term);
    while machine.has_next() {
        machine.step();
    }
    machine.value()
}

/// Like [`normalize`], but stops after at most `max_steps` rewrite steps and
/// returns the (possibly still-reducible) term reached so far.
pub fn normalize_bounded(term: Term, max_steps: usize) -> Term {
    let mut machine = Machine::new(term);
    let mut taken = 0;
    while machine.has_next() && taken < max_steps {
        machine.step();
        taken += 1;
    }
    machine.value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn run(src: &str) -> String {
        normalize(parse(src).unwrap()).to_string()
    }

    #[test]
    fn unquote_axiom() {
        assert_eq!(run("[foo] a"), "foo");
    }

    #[test]
    fn quote_axiom() {
        assert_eq!(run("[foo] b"), "[[foo]]");
    }

    #[test]
    fn compose_axiom() {
        assert_eq!(run("[foo] [bar] c"), "[foo bar]");
    }

    #[test]
    fn dup_axiom() {
        assert_eq!(run("[foo] d"), "[foo] [foo]");
    }

    #[test]
    fn drop_axiom() {
        assert_eq!(run("[foo] e"), "");
    }

    #[test]
    fn swap_axiom() {
        assert_eq!(run("[foo] [bar] f"), "[bar] [foo]");
    }

    #[test]
    fn reserved_primitives_are_identity() {
        assert_eq!(run("[foo] g"), "[foo]");
        assert_eq!(run("[foo] h"), "[foo]");
    }

    #[test]
    fn bare_primitive_residual() {
        assert_eq!(run("a"), "a");
    }

    #[test]
    fn out_of_range_constant_thunks_instead_of_panicking() {
        // `Term::constant` is unconstrained and doesn't go through `parse`,
        // so a caller can build a letter outside `a..h` directly.
        let term = Term::variable("foo").quote().seq(Term::constant('x'));
        assert_eq!(normalize(term).to_string(), "[foo] x");
    }

    #[test]
    fn variable_thunks_before_primitive() {
        assert_eq!(run("foo a"), "foo a");
    }

    #[test]
    fn unquote_consumes_only_the_top() {
        assert_eq!(run("[foo] [bar] a"), "[foo] bar");
    }

    #[test]
    fn annotate_has_no_residual_effect_on_quote() {
        assert_eq!(run("@note [foo]"), "[foo]");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize(parse("[foo] [bar] c").unwrap());
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn parse_print_round_trips_on_normal_forms() {
        for src in ["foo a", "[foo] [bar] a", "[foo] [foo]", "@note [foo]"] {
            let normalized = normalize(parse(src).unwrap());
            let printed = normalized.to_string();
            assert_eq!(normalize(parse(&printed).unwrap()), normalized);
        }
    }

    #[test]
    fn normalize_bounded_stops_on_divergence() {
        // `[d a] d a` re-derives itself forever under unquote.
        let term = parse("[d a] d a").unwrap();
        let result = normalize_bounded(term, 1000);
        // Just check it terminates with a non-empty printed form; the exact
        // residual shape is an implementation detail of where the bound cut in.
        assert!(!result.to_string().is_empty());
    }
}

use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// An element of the concatenative calculus: a program and a value share
/// this one type.
///
/// `Term` is a value object: `Eq`/`Hash`/`Clone` are structural and a `Term`
/// is never mutated after construction. `Quote` and `Catenate` hold their
/// children behind `Rc` so that [`Term::seq`]'s right-association and
/// primitive `d` (dup) can share structure instead of deep-cloning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// The empty program; two-sided unit of [`Term::seq`].
    Identity,
    /// A primitive opcode, one of the letters `a`..`h`.
    Constant(char),
    /// A symbolic identifier that is not a primitive letter.
    Variable(Rc<str>),
    /// An `@`-prefixed identifier, inert during reduction.
    Annotate(Rc<str>),
    /// A quoted term; the only kind of value the machine's data stack holds
    /// in normal runs.
    Quote(Rc<Term>),
    /// The binary "then" combinator; concatenative composition.
    Catenate(Rc<Term>, Rc<Term>),
}

impl Term {
    pub fn identity() -> Term {
        Term::Identity
    }

    pub fn constant(letter: char) -> Term {
        Term::Constant(letter)
    }

    pub fn variable(name: impl Into<Rc<str>>) -> Term {
        Term::Variable(name.into())
    }

    pub fn annotate(name: impl Into<Rc<str>>) -> Term {
        Term::Annotate(name.into())
    }

    /// Wrap any term in a [`Term::Quote`].
    pub fn quote(self) -> Term {
        Term::Quote(Rc::new(self))
    }

    /// Concatenate `self` then `rhs`, right-associating `Catenate` and
    /// dropping `Identity` on either side.
    ///
    /// `seq` never allocates a `Catenate` whose first child is itself a
    /// `Catenate`: the canonical shape of a nonempty sequence is a
    /// right-leaning spine.
    pub fn seq(self, rhs: Term) -> Term {
        if let Term::Identity = rhs {
            return self;
        }
        match self {
            Term::Identity => rhs,
            Term::Catenate(fst, snd) => {
                let hidden = Rc::unwrap_or_clone(snd).seq(rhs);
                Rc::unwrap_or_clone(fst).seq(hidden)
            }
            other => Term::Catenate(Rc::new(other), Rc::new(rhs)),
        }
    }

    /// Right-fold a sequence of terms with [`Term::seq`], starting from
    /// [`Term::Identity`]. Produces the canonical right-leaning spine.
    pub fn from_array(xs: Vec<Term>) -> Term {
        xs.into_iter()
            .rev()
            .fold(Term::Identity, |state, child| child.seq(state))
    }

    pub fn as_quote(&self) -> Option<&Term> {
        match self {
            Term::Quote(body) => Some(body),
            _ => None,
        }
    }

    /// Render an indented tree view of this term for interactive
    /// inspection; not the canonical textual form (see [`Display`]).
    pub fn print_tree(&self) -> std::io::Result<()> {
        ptree::print_tree(self)
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Identity => Ok(()),
            Term::Constant(c) => write!(f, "{c}"),
            Term::Variable(name) => write!(f, "{name}"),
            Term::Annotate(name) => write!(f, "@{name}"),
            Term::Quote(body) => write!(f, "[{body}]"),
            Term::Catenate(fst, snd) => write!(f, "{fst} {snd}"),
        }
    }
}

impl ptree::TreeItem for Term {
    type Child = Term;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        match self {
            Term::Identity => write!(f, "Identity"),
            Term::Constant(c) => write!(f, "Constant({c})"),
            Term::Variable(name) => write!(f, "Variable({name})"),
            Term::Annotate(name) => write!(f, "Annotate({name})"),
            Term::Quote(_) => write!(f, "Quote"),
            Term::Catenate(_, _) => write!(f, "Catenate"),
        }
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        match self {
            Term::Quote(body) => std::borrow::Cow::Owned(vec![(**body).clone()]),
            Term::Catenate(fst, snd) => {
                std::borrow::Cow::Owned(vec![(**fst).clone(), (**snd).clone()])
            }
            _ => std::borrow::Cow::Borrowed(&[]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_identity_is_two_sided_unit() {
        let t = Term::variable("x");
        assert_eq!(t.clone().seq(Term::Identity), t);
        assert_eq!(Term::Identity.seq(t.clone()), t);
    }

    #[test]
    fn seq_right_associates() {
        let a = Term::variable("a");
        let b = Term::variable("b");
        let c = Term::variable("c");

        let lhs = a.clone().seq(b.clone()).seq(c.clone());
        let rhs = a.seq(b.seq(c));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn seq_never_nests_catenate_on_the_left() {
        let spine = Term::from_array(vec![
            Term::variable("a"),
            Term::variable("b"),
            Term::variable("c"),
        ]);
        match spine {
            Term::Catenate(fst, _) => assert!(!matches!(*fst, Term::Catenate(_, _))),
            _ => panic!("expected a Catenate spine"),
        }
    }

    #[test]
    fn display_matches_canonical_syntax() {
        let t = Term::from_array(vec![
            Term::variable("foo").quote(),
            Term::variable("bar").quote(),
            Term::constant('c'),
        ]);
        assert_eq!(t.to_string(), "[foo] [bar] c");
    }
}

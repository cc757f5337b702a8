//! Typed expressions compiled into TEAL.

use crate::error::{RouterError, RouterResult};
use avm_teal::{GlobalField, OpCode, ProgramBuilder, TxnField};
use std::fmt;
use std::ops;

/// Type of the value an expression leaves on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TealType {
    Uint64,
    Bytes,
    /// Leaves nothing on the stack.
    None,
}

impl fmt::Display for TealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TealType::Uint64 => "uint64",
            TealType::Bytes => "bytes",
            TealType::None => "none",
        };
        f.write_str(name)
    }
}

/// An expression tree.
///
/// Arithmetic is available through the `+ - * / %` operators and `!`:
///
/// ```rust
/// use avm_router::Expr;
///
/// let sum = Expr::arg(0) + Expr::arg(1);
/// let guard = !Expr::int(0);
/// assert_eq!(sum, Expr::Add(Box::new(Expr::Arg(0)), Box::new(Expr::Arg(1))));
/// assert_eq!(guard, Expr::Not(Box::new(Expr::Int(0))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Int(u64),
    Bytes(Vec<u8>),
    /// Method argument by position, only valid inside a method body.
    Arg(usize),

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Mod(Box<Expr>, Box<Expr>),

    Eq(Box<Expr>, Box<Expr>),
    Neq(Box<Expr>, Box<Expr>),
    Lt(Box<Expr>, Box<Expr>),
    Gt(Box<Expr>, Box<Expr>),
    Le(Box<Expr>, Box<Expr>),
    Ge(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),

    Itob(Box<Expr>),
    Btoi(Box<Expr>),

    TxnSender,
    TxnApplicationId,
    GlobalCreatorAddress,

    Approve,
    Reject,
    Return(Box<Expr>),
    Assert(Box<Expr>),
    Seq(Vec<Expr>),
}

impl Expr {
    pub fn int(value: u64) -> Self {
        Expr::Int(value)
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Expr::Bytes(value.into())
    }

    pub fn arg(index: usize) -> Self {
        Expr::Arg(index)
    }

    pub fn equals(self, other: Expr) -> Self {
        Expr::Eq(Box::new(self), Box::new(other))
    }

    pub fn not_equals(self, other: Expr) -> Self {
        Expr::Neq(Box::new(self), Box::new(other))
    }

    pub fn lt(self, other: Expr) -> Self {
        Expr::Lt(Box::new(self), Box::new(other))
    }

    pub fn gt(self, other: Expr) -> Self {
        Expr::Gt(Box::new(self), Box::new(other))
    }

    pub fn le(self, other: Expr) -> Self {
        Expr::Le(Box::new(self), Box::new(other))
    }

    pub fn ge(self, other: Expr) -> Self {
        Expr::Ge(Box::new(self), Box::new(other))
    }

    pub fn and(self, other: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(other))
    }

    pub fn itob(self) -> Self {
        Expr::Itob(Box::new(self))
    }

    pub fn btoi(self) -> Self {
        Expr::Btoi(Box::new(self))
    }

    /// `Return(value)`: approve iff `value` is non-zero.
    pub fn ret(value: Expr) -> Self {
        Expr::Return(Box::new(value))
    }

    pub fn assert(condition: Expr) -> Self {
        Expr::Assert(Box::new(condition))
    }

    /// `Txn.sender == Global.creator_address`.
    pub fn is_creator() -> Self {
        Expr::TxnSender.equals(Expr::GlobalCreatorAddress)
    }

    /// Whether evaluation always ends the program.
    pub fn terminates(&self) -> bool {
        match self {
            Expr::Approve | Expr::Reject | Expr::Return(_) => true,
            Expr::Seq(items) => items.last().map_or(false, Expr::terminates),
            _ => false,
        }
    }

    /// Type checks the expression. `args` gives the type of each `Arg`.
    pub fn type_of(&self, args: &[TealType]) -> RouterResult<TealType> {
        let expect = |expr: &Expr, expected: TealType, context: &str| -> RouterResult<()> {
            let actual = expr.type_of(args)?;
            if actual != expected {
                return Err(RouterError::type_mismatch(context, expected, actual));
            }
            Ok(())
        };

        Ok(match self {
            Expr::Int(_) => TealType::Uint64,
            Expr::Bytes(_) => TealType::Bytes,
            Expr::Arg(index) => *args.get(*index).ok_or(RouterError::ArgumentOutOfRange {
                index: *index,
                count: args.len(),
            })?,
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Mod(a, b)
            | Expr::Lt(a, b)
            | Expr::Gt(a, b)
            | Expr::Le(a, b)
            | Expr::Ge(a, b)
            | Expr::And(a, b)
            | Expr::Or(a, b) => {
                let context = self.op().map_or("expression", OpCode::name);
                expect(a, TealType::Uint64, context)?;
                expect(b, TealType::Uint64, context)?;
                TealType::Uint64
            }
            Expr::Eq(a, b) | Expr::Neq(a, b) => {
                let left = a.type_of(args)?;
                if left == TealType::None {
                    return Err(RouterError::type_mismatch("==", "uint64 or bytes", left));
                }
                expect(b, left, "==")?;
                TealType::Uint64
            }
            Expr::Not(a) => {
                expect(a, TealType::Uint64, "!")?;
                TealType::Uint64
            }
            Expr::Itob(a) => {
                expect(a, TealType::Uint64, "itob")?;
                TealType::Bytes
            }
            Expr::Btoi(a) => {
                expect(a, TealType::Bytes, "btoi")?;
                TealType::Uint64
            }
            Expr::TxnSender | Expr::GlobalCreatorAddress => TealType::Bytes,
            Expr::TxnApplicationId => TealType::Uint64,
            Expr::Approve | Expr::Reject => TealType::None,
            Expr::Return(a) => {
                expect(a, TealType::Uint64, "return")?;
                TealType::None
            }
            Expr::Assert(a) => {
                expect(a, TealType::Uint64, "assert")?;
                TealType::None
            }
            Expr::Seq(items) => {
                let Some((last, init)) = items.split_last() else {
                    return Ok(TealType::None);
                };
                for item in init {
                    expect(item, TealType::None, "seq")?;
                }
                last.type_of(args)?
            }
        })
    }

    /// Opcode applied by binary and unary operator nodes.
    fn op(&self) -> Option<OpCode> {
        Some(match self {
            Expr::Add(..) => OpCode::Add,
            Expr::Sub(..) => OpCode::Sub,
            Expr::Mul(..) => OpCode::Mul,
            Expr::Div(..) => OpCode::Div,
            Expr::Mod(..) => OpCode::Mod,
            Expr::Eq(..) => OpCode::Eq,
            Expr::Neq(..) => OpCode::Neq,
            Expr::Lt(..) => OpCode::Lt,
            Expr::Gt(..) => OpCode::Gt,
            Expr::Le(..) => OpCode::Le,
            Expr::Ge(..) => OpCode::Ge,
            Expr::And(..) => OpCode::And,
            Expr::Or(..) => OpCode::Or,
            Expr::Not(_) => OpCode::Not,
            Expr::Itob(_) => OpCode::Itob,
            Expr::Btoi(_) => OpCode::Btoi,
            _ => return None,
        })
    }

    /// Emits the expression. `arg_slots` maps each `Arg` to its scratch slot.
    pub fn compile(&self, builder: &mut ProgramBuilder, arg_slots: &[u8]) -> RouterResult<()> {
        match self {
            Expr::Int(value) => {
                builder.emit_int(*value);
            }
            Expr::Bytes(bytes) => {
                builder.emit_bytes(bytes);
            }
            Expr::Arg(index) => {
                let slot = arg_slots
                    .get(*index)
                    .ok_or(RouterError::ArgumentOutOfRange {
                        index: *index,
                        count: arg_slots.len(),
                    })?;
                builder.emit_load(*slot);
            }
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Mod(a, b)
            | Expr::Eq(a, b)
            | Expr::Neq(a, b)
            | Expr::Lt(a, b)
            | Expr::Gt(a, b)
            | Expr::Le(a, b)
            | Expr::Ge(a, b)
            | Expr::And(a, b)
            | Expr::Or(a, b) => {
                a.compile(builder, arg_slots)?;
                b.compile(builder, arg_slots)?;
                if let Some(op) = self.op() {
                    builder.emit_opcode(op);
                }
            }
            Expr::Not(a) | Expr::Itob(a) | Expr::Btoi(a) => {
                a.compile(builder, arg_slots)?;
                if let Some(op) = self.op() {
                    builder.emit_opcode(op);
                }
            }
            Expr::TxnSender => {
                builder.emit_txn(TxnField::Sender);
            }
            Expr::TxnApplicationId => {
                builder.emit_txn(TxnField::ApplicationID);
            }
            Expr::GlobalCreatorAddress => {
                builder.emit_global(GlobalField::CreatorAddress);
            }
            Expr::Approve => {
                builder.emit_int(1).emit_opcode(OpCode::Return);
            }
            Expr::Reject => {
                builder.emit_int(0).emit_opcode(OpCode::Return);
            }
            Expr::Return(a) => {
                a.compile(builder, arg_slots)?;
                builder.emit_opcode(OpCode::Return);
            }
            Expr::Assert(a) => {
                a.compile(builder, arg_slots)?;
                builder.emit_opcode(OpCode::Assert);
            }
            Expr::Seq(items) => {
                for item in items {
                    item.compile(builder, arg_slots)?;
                }
            }
        }
        Ok(())
    }
}

impl ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::Add(Box::new(self), Box::new(rhs))
    }
}

impl ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::Sub(Box::new(self), Box::new(rhs))
    }
}

impl ops::Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(Box::new(self), Box::new(rhs))
    }
}

impl ops::Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::Div(Box::new(self), Box::new(rhs))
    }
}

impl ops::Rem for Expr {
    type Output = Expr;

    fn rem(self, rhs: Expr) -> Expr {
        Expr::Mod(Box::new(self), Box::new(rhs))
    }
}

impl ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

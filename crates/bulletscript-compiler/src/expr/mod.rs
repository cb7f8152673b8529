//! Expression compilation.
//!
//! [`ExprCompiler::generate`] turns an expression into a standalone
//! [`CodeBlock`] that leaves exactly one value on the stack. Fragments are
//! composed by appending, so nothing emitted here may contain an absolute
//! jump target; the ternary operator uses relative offsets for that reason.

mod assignment;
mod binary;
mod calls;
mod identifiers;
mod literals;
mod ternary;
mod unary;

use bulletscript_ast::{BinaryOp, Expr};
use bulletscript_core::{
    BinaryOperator, CodeBlock, CodeScope, CompilationError, Instruction, Span,
};
use bulletscript_registry::ScriptRegistry;

use crate::ScopeStack;

pub(crate) type Result<T> = std::result::Result<T, CompilationError>;

/// Compiles expressions against the current scope and the registry.
pub struct ExprCompiler<'a, 'reg> {
    scopes: &'a ScopeStack,
    registry: &'reg ScriptRegistry,
}

impl<'a, 'reg> ExprCompiler<'a, 'reg> {
    /// Create an expression compiler.
    pub fn new(scopes: &'a ScopeStack, registry: &'reg ScriptRegistry) -> Self {
        Self { scopes, registry }
    }

    /// Generate standalone code for `expr`.
    pub fn generate<'ast>(&self, expr: &Expr<'ast>) -> Result<CodeBlock> {
        match expr {
            Expr::Literal(lit) => Ok(literals::generate_literal(lit.value)),
            Expr::Ident(ident) => identifiers::generate_variable(self, ident.name, ident.span),
            Expr::Property(prop) => identifiers::generate_property(self, prop.name, prop.span),
            Expr::Binary(bin) => binary::generate_binary(self, bin),
            Expr::Unary(un) => unary::generate_unary(self, un),
            Expr::Assign(assign) => assignment::generate_assign(self, assign),
            Expr::Postfix(postfix) => assignment::generate_postfix(self, postfix),
            Expr::Ternary(ternary) => ternary::generate_ternary(self, ternary),
            Expr::Call(call) => calls::generate_call(self, call),
        }
    }

    /// Generate code for each expression in order, concatenated.
    pub fn generate_all<'ast>(&self, exprs: &[Expr<'ast>]) -> Result<CodeBlock> {
        let mut code = CodeBlock::new();
        for expr in exprs {
            code.append(&self.generate(expr)?);
        }
        Ok(code)
    }

    /// The scope symbols resolve against.
    pub fn current_scope(&self) -> Result<&'a CodeScope> {
        self.scopes.current()
    }

    /// The registry.
    pub fn registry(&self) -> &'reg ScriptRegistry {
        self.registry
    }

    /// Resolve an assignment target.
    pub(crate) fn resolve_lvalue<'ast>(&self, target: &Expr<'ast>) -> Result<LValue> {
        match target {
            Expr::Ident(ident) => {
                identifiers::numerical_slot(self, ident.name, ident.span).map(LValue::Variable)
            }
            Expr::Property(prop) => {
                identifiers::property_slot(self, prop.name, prop.span).map(LValue::Property)
            }
            other => Err(CompilationError::NotAssignable { span: other.span() }),
        }
    }
}

/// A storage location an assignment can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LValue {
    /// Numerical slot in the current scope.
    Variable(usize),
    /// Global property index.
    Property(usize),
}

impl LValue {
    pub(crate) fn emit_get(self, code: &mut CodeBlock) {
        match self {
            LValue::Variable(index) => code.write_indexed(Instruction::GetVariable, index),
            LValue::Property(index) => code.write_indexed(Instruction::GetProperty, index),
        }
    }

    pub(crate) fn emit_set(self, code: &mut CodeBlock) {
        match self {
            LValue::Variable(index) => code.write_indexed(Instruction::SetVariable, index),
            LValue::Property(index) => code.write_indexed(Instruction::SetProperty, index),
        }
    }
}

/// The VM operator implementing a source operator.
pub(crate) fn binary_operator(op: BinaryOp) -> BinaryOperator {
    match op {
        BinaryOp::Add => BinaryOperator::Add,
        BinaryOp::Sub => BinaryOperator::Subtract,
        BinaryOp::Mul => BinaryOperator::Multiply,
        BinaryOp::Div => BinaryOperator::Divide,
        BinaryOp::Mod => BinaryOperator::Mod,
        BinaryOp::Less => BinaryOperator::LessThan,
        BinaryOp::LessEqual => BinaryOperator::LessThanEqual,
        BinaryOp::Greater => BinaryOperator::GreaterThan,
        BinaryOp::GreaterEqual => BinaryOperator::GreaterThanEqual,
        BinaryOp::Equal => BinaryOperator::Equal,
        BinaryOp::NotEqual => BinaryOperator::NotEqual,
        BinaryOp::LogicalAnd => BinaryOperator::And,
        BinaryOp::LogicalOr => BinaryOperator::Or,
    }
}

/// Fail unless `found` matches `expected`.
pub(crate) fn check_arity(
    kind: &'static str,
    name: &str,
    expected: usize,
    found: usize,
    span: Span,
) -> Result<()> {
    if expected != found {
        return Err(CompilationError::ArgumentCountMismatch {
            kind,
            name: name.to_string(),
            expected,
            found,
            span,
        });
    }
    Ok(())
}

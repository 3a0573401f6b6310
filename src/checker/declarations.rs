//! Signature registration (pass 1) and function bodies
//!
//! All signatures are collected before any body is checked, which is what
//! allows forward references and mutual recursion.

use super::scope::Symbol;
use super::typed::{Callee, CheckedFunction, CheckedProgram, ExternalSignature, TypedParam, TypedStmt};
use super::types::{FunctionType, Type};
use super::{Checker, FunctionContext, TypeError};
use crate::parser::ast::{FunctionDecl, Item, Param, Program, SourceLocation, TypeName};

impl Checker<'_> {
    /// Register every function and external signature in source order
    pub(super) fn register_declarations(
        &mut self,
        program: &Program,
        checked: &mut CheckedProgram,
    ) -> Result<(), TypeError> {
        for item in &program.items {
            match item {
                Item::Function(func) => {
                    let (params, signature) =
                        self.resolve_signature(&func.params, func.return_type.as_ref())?;
                    let callee = Callee::User(checked.functions.len());
                    self.register_name(&func.name, callee, signature.clone(), func.location)?;

                    checked.functions.push(CheckedFunction {
                        name: func.name.clone(),
                        params,
                        signature,
                        body: Vec::new(),
                        location: func.location,
                    });
                }
                Item::External(ext) => {
                    let (_, signature) =
                        self.resolve_signature(&ext.params, ext.return_type.as_ref())?;
                    self.validate_host_binding(&ext.name, &signature, ext.location)?;

                    let callee = Callee::Foreign(checked.externals.len());
                    self.register_name(&ext.name, callee, signature.clone(), ext.location)?;

                    checked.externals.push(ExternalSignature {
                        name: ext.name.clone(),
                        signature,
                        location: ext.location,
                    });
                }
                Item::Statement(_) => {}
            }
        }
        Ok(())
    }

    /// Check a function body against its registered signature
    pub(super) fn check_function_body(
        &mut self,
        func: &FunctionDecl,
        signature: &FunctionType,
    ) -> Result<Vec<TypedStmt>, TypeError> {
        self.scopes = super::scope::SymbolTable::new();
        self.loop_depth = 0;
        self.current_function = Some(FunctionContext {
            name: func.name.clone(),
            return_type: signature.return_type().cloned(),
        });

        for (param, ty) in func.params.iter().zip(&signature.params) {
            self.declare_variable(&param.name, ty.clone(), false, param.location)?;
        }

        self.scopes.push_scope();
        let body = self.check_block(&func.body);
        self.scopes.pop_scope();
        let body = body?;

        if let Some(ret) = signature.return_type() {
            if !Self::always_returns(&body) {
                return Err(TypeError::new(
                    format!(
                        "Function '{}' must return a value of type {} on every path",
                        func.name, ret
                    ),
                    func.location,
                ));
            }
        }

        self.current_function = None;
        Ok(body)
    }

    pub(super) fn resolve_type(&self, name: &TypeName) -> Result<Type, TypeError> {
        Type::from_name(name)
            .ok_or_else(|| TypeError::new(format!("Unknown type '{}'", name.name), name.location))
    }

    fn resolve_signature(
        &self,
        params: &[Param],
        return_type: Option<&TypeName>,
    ) -> Result<(Vec<TypedParam>, FunctionType), TypeError> {
        let mut typed_params: Vec<TypedParam> = Vec::with_capacity(params.len());
        for param in params {
            if typed_params.iter().any(|p| p.name == param.name) {
                return Err(TypeError::new(
                    format!("Duplicate parameter '{}'", param.name),
                    param.location,
                ));
            }
            typed_params.push(TypedParam {
                name: param.name.clone(),
                ty: self.resolve_type(&param.param_type)?,
            });
        }

        let ret = return_type.map(|t| self.resolve_type(t)).transpose()?;
        let signature = FunctionType::new(typed_params.iter().map(|p| p.ty.clone()).collect(), ret);
        Ok((typed_params, signature))
    }

    fn register_name(
        &mut self,
        name: &str,
        callee: Callee,
        signature: FunctionType,
        location: SourceLocation,
    ) -> Result<(), TypeError> {
        if self.functions.contains_key(name) {
            return Err(TypeError::new(
                format!("Function '{}' is already declared", name),
                location,
            ));
        }
        self.functions.insert(name.to_string(), (callee, signature));
        Ok(())
    }

    fn validate_host_binding(
        &self,
        name: &str,
        declared: &FunctionType,
        location: SourceLocation,
    ) -> Result<(), TypeError> {
        let binding = self.host.binding(name).ok_or_else(|| {
            TypeError::new(
                format!("External function '{}' is not provided by the host", name),
                location,
            )
        })?;

        match binding.signature() {
            Some(expected) if expected != declared => Err(TypeError::new(
                format!(
                    "External function '{}' is declared as {} but the host provides {}",
                    name, declared, expected
                ),
                location,
            )),
            _ => Ok(()),
        }
    }

    pub(super) fn declare_variable(
        &mut self,
        name: &str,
        ty: Type,
        is_const: bool,
        location: SourceLocation,
    ) -> Result<(), TypeError> {
        self.scopes
            .declare(
                name,
                Symbol {
                    ty,
                    is_const,
                    location,
                },
            )
            .map_err(|previous| {
                TypeError::new(
                    format!(
                        "Variable '{}' is already declared in this scope (line {})",
                        name, previous.line
                    ),
                    location,
                )
            })
    }

    /// Definite-return analysis over checked statements
    pub(super) fn always_returns(stmts: &[TypedStmt]) -> bool {
        stmts.iter().any(|stmt| match stmt {
            TypedStmt::Return { .. } => true,
            TypedStmt::If {
                then_branch,
                else_branch: Some(else_branch),
                ..
            } => Self::always_returns(then_branch) && Self::always_returns(else_branch),
            TypedStmt::Block { statements, .. } => Self::always_returns(statements),
            _ => false,
        })
    }
}

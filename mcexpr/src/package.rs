//! Declaration store
//!
//! A [`Package`] owns every named element the expression language can refer
//! to: variables, constants and parameters ([`Declaration`]), named types
//! ([`TypeDeclaration`]), functions ([`FunctionDeclaration`]) and components
//! together with the instances binding their parameters.
//!
//! Elements live in slot maps and are referred to by small copyable keys
//! ([`DeclKey`], [`TypeDeclKey`], ...). Expressions and types never own the
//! declarations they mention; they only carry keys into the package.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use strum::EnumIs;

use crate::{
    expr::Expr,
    types::{FieldDeclaration, Type},
    utils::{Error, ExprResult},
};

new_key_type! {
    /// Key of a [`Declaration`] inside a [`Package`].
    pub struct DeclKey;

    /// Key of a [`TypeDeclaration`] inside a [`Package`].
    pub struct TypeDeclKey;

    /// Key of a [`FunctionDeclaration`] inside a [`Package`].
    pub struct FunctionKey;

    /// Key of a [`Component`] inside a [`Package`].
    pub struct ComponentKey;
}

/// Element a parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParameterOwner {
    /// `index`-th parameter of a component, bound by the argument lists of
    /// the component instances.
    Component { component: ComponentKey, index: usize },

    /// `index`-th parameter of a function, bound at each call site.
    Function { function: FunctionKey, index: usize },

    /// Iteration parameter of a loop or a quantifier.
    Local,
}

/// Kind of a [`Declaration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeclarationKind {
    Variable,
    Constant,
    Parameter(ParameterOwner),
}

/// A typed, named value: variable, constant or parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub ty: Type,
    /// Initial value of variables, value of constants.
    pub initial: Option<Expr>,
}

/// A named type: an alias, a record or an enumeration.
///
/// Records and enumerations declared here have nominal identity: two
/// [`Type::Named`] referring to different declarations are never equal even
/// if their definitions are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeDeclaration {
    pub name: String,
    pub ty: Type,
}

/// A pure function whose body is a single expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionDeclaration {
    pub name: String,
    pub parameters: Vec<DeclKey>,
    pub return_type: Type,
    pub body: Expr,
}

/// A parameterized component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Component {
    pub name: String,
    pub parameters: Vec<DeclKey>,
}

/// An instantiation of a [`Component`]; `arguments` bind its parameters
/// positionally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentInstance {
    pub name: String,
    pub component: ComponentKey,
    pub arguments: Vec<Expr>,
}

/// Store of every declaration referenced by expressions, types and actions.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Package {
    pub name: String,
    declarations: SlotMap<DeclKey, Declaration>,
    types: SlotMap<TypeDeclKey, TypeDeclaration>,
    functions: SlotMap<FunctionKey, FunctionDeclaration>,
    components: SlotMap<ComponentKey, Component>,
    instances: Vec<ComponentInstance>,
}

impl Package {
    /// Create an empty package.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn insert_declaration(
        &mut self,
        name: impl Into<String>,
        kind: DeclarationKind,
        ty: Type,
        initial: Option<Expr>,
    ) -> DeclKey {
        self.declarations.insert(Declaration {
            name: name.into(),
            kind,
            ty,
            initial,
        })
    }

    /// Declare a state variable, optionally with an initial value.
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        ty: Type,
        initial: Option<Expr>,
    ) -> DeclKey {
        self.insert_declaration(name, DeclarationKind::Variable, ty, initial)
    }

    /// Declare a constant with its value.
    pub fn add_constant(&mut self, name: impl Into<String>, ty: Type, value: Expr) -> DeclKey {
        self.insert_declaration(name, DeclarationKind::Constant, ty, Some(value))
    }

    /// Declare the iteration parameter of a loop or a quantifier.
    pub fn add_local_parameter(&mut self, name: impl Into<String>, ty: Type) -> DeclKey {
        self.insert_declaration(
            name,
            DeclarationKind::Parameter(ParameterOwner::Local),
            ty,
            None,
        )
    }

    /// Declare a named type (alias, record or enumeration definition).
    pub fn add_type_declaration(&mut self, name: impl Into<String>, ty: Type) -> TypeDeclKey {
        self.types.insert(TypeDeclaration {
            name: name.into(),
            ty,
        })
    }

    /// Declare an enumeration type with the given ordered literals.
    pub fn add_enumeration<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        literals: impl IntoIterator<Item = S>,
    ) -> TypeDeclKey {
        let literals = literals.into_iter().map(Into::into).collect();
        self.add_type_declaration(name, Type::Enumeration(literals))
    }

    /// Declare a record type with the given ordered fields.
    pub fn add_record<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (S, Type)>,
    ) -> TypeDeclKey {
        let fields = fields
            .into_iter()
            .map(|(name, ty)| FieldDeclaration {
                name: name.into(),
                ty,
            })
            .collect();
        self.add_type_declaration(name, Type::Record(fields))
    }

    /// Declare a component and its parameters. Returns the component key; the
    /// parameter keys are available through [`Component::parameters`].
    pub fn add_component<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        parameters: impl IntoIterator<Item = (S, Type)>,
    ) -> ComponentKey {
        let declarations = &mut self.declarations;
        let parameters: Vec<_> = parameters.into_iter().collect();
        self.components.insert_with_key(|component| {
            let parameters = parameters
                .into_iter()
                .enumerate()
                .map(|(index, (name, ty))| {
                    declarations.insert(Declaration {
                        name: name.into(),
                        kind: DeclarationKind::Parameter(ParameterOwner::Component {
                            component,
                            index,
                        }),
                        ty,
                        initial: None,
                    })
                })
                .collect();
            Component {
                name: name.into(),
                parameters,
            }
        })
    }

    /// Instantiate `component`, binding its parameters to `arguments`.
    pub fn add_instance(
        &mut self,
        name: impl Into<String>,
        component: ComponentKey,
        arguments: Vec<Expr>,
    ) -> ExprResult<()> {
        self.component(component)?;
        self.instances.push(ComponentInstance {
            name: name.into(),
            component,
            arguments,
        });
        Ok(())
    }

    /// Declare a function. `body` receives the keys of the freshly declared
    /// parameters, in order, and builds the function body from them.
    pub fn add_function<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        parameters: impl IntoIterator<Item = (S, Type)>,
        return_type: Type,
        body: impl FnOnce(&[DeclKey]) -> Expr,
    ) -> FunctionKey {
        let declarations = &mut self.declarations;
        let parameters: Vec<_> = parameters.into_iter().collect();
        self.functions.insert_with_key(|function| {
            let parameters: Vec<DeclKey> = parameters
                .into_iter()
                .enumerate()
                .map(|(index, (name, ty))| {
                    declarations.insert(Declaration {
                        name: name.into(),
                        kind: DeclarationKind::Parameter(ParameterOwner::Function {
                            function,
                            index,
                        }),
                        ty,
                        initial: None,
                    })
                })
                .collect();
            let body = body(&parameters);
            FunctionDeclaration {
                name: name.into(),
                parameters,
                return_type,
                body,
            }
        })
    }

    /// Retrieve a declaration.
    pub fn declaration(&self, key: DeclKey) -> ExprResult<&Declaration> {
        self.declarations.get(key).ok_or(Error::UnknownDeclaration {
            kind: "declaration",
        })
    }

    /// Mutably retrieve a declaration (e.g. to set an initial value).
    pub fn declaration_mut(&mut self, key: DeclKey) -> ExprResult<&mut Declaration> {
        self.declarations.get_mut(key).ok_or(Error::UnknownDeclaration {
            kind: "declaration",
        })
    }

    /// Retrieve a type declaration.
    pub fn type_declaration(&self, key: TypeDeclKey) -> ExprResult<&TypeDeclaration> {
        self.types.get(key).ok_or(Error::UnknownDeclaration {
            kind: "type declaration",
        })
    }

    /// Retrieve a function declaration.
    pub fn function(&self, key: FunctionKey) -> ExprResult<&FunctionDeclaration> {
        self.functions.get(key).ok_or(Error::UnknownDeclaration { kind: "function" })
    }

    /// Retrieve a component.
    pub fn component(&self, key: ComponentKey) -> ExprResult<&Component> {
        self.components
            .get(key)
            .ok_or(Error::UnknownDeclaration { kind: "component" })
    }

    /// Every instance of `component`, in declaration order.
    pub fn instances_of(
        &self,
        component: ComponentKey,
    ) -> impl Iterator<Item = &ComponentInstance> + '_ {
        self.instances
            .iter()
            .filter(move |instance| instance.component == component)
    }

    /// All component instances, in declaration order.
    pub fn instances(&self) -> &[ComponentInstance] {
        &self.instances
    }

    /// Iterate over every declaration of the package.
    pub fn declarations(&self) -> impl Iterator<Item = (DeclKey, &Declaration)> {
        self.declarations.iter()
    }

    /// Find the first declaration named `name`.
    pub fn find_declaration(&self, name: &str) -> Option<DeclKey> {
        self.declarations
            .iter()
            .find(|(_, declaration)| declaration.name == name)
            .map(|(key, _)| key)
    }

    /// Build the literal `name` of the enumeration declared by `ty`.
    pub fn enum_literal(&self, ty: TypeDeclKey, name: &str) -> ExprResult<Expr> {
        let declaration = self.type_declaration(ty)?;
        let Type::Enumeration(literals) = &declaration.ty else {
            return Err(Error::TypeMismatch {
                expected: "an enumeration type".to_string(),
                found: declaration.name.clone(),
            });
        };

        literals
            .iter()
            .position(|literal| literal == name)
            .map(|index| Expr::EnumLiteral { ty, index })
            .ok_or_else(|| Error::UnknownField {
                field: name.to_string(),
                ty: declaration.name.clone(),
            })
    }
}

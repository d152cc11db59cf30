//! Syntax tree helpers for program sources (TypeScript / JavaScript).
//!
//! These are shared by every parser strategy that reads program source:
//! - parsing a file into a swc `Module`
//! - finding classes, the property holding a given service, and calls made through it
//! - finding plain function calls and aliased named imports
//! - statically evaluating call arguments into the literal strings they can produce

use std::path::Path;

use anyhow::{Result, anyhow};
use swc_common::{FileName, Globals, SourceMap, sync::Lrc};
use swc_ecma_ast::{
    BinaryOp, CallExpr, Callee, Class, ClassMember, Constructor, Decorator, Expr, Function,
    ImportSpecifier, Lit, MemberProp, Module, ModuleDecl, ModuleExportName, ModuleItem,
    ParamOrTsParamProp, Prop, PropName, PropOrSpread, TsEntityName, TsParamPropParam, TsType,
    TsTypeAnn,
};
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};

/// Parse program source into a module.
///
/// The syntax is chosen from the file extension: `.js`-family files are parsed
/// as JavaScript with JSX, everything else as TypeScript (TSX for `.tsx`).
/// Decorators are always enabled.
pub fn parse_program_source(source: &str, file_path: &str) -> Result<Module> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_map: Lrc<SourceMap> = Default::default();
        let source_file = source_map
            .new_source_file(FileName::Real(file_path.into()).into(), source.to_string());

        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            None,
        );

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path, e.kind()))?;

        // Errors the parser recovered from (`with` in a module, legacy octals, ...)
        if let Some(error) = parser.take_errors().first() {
            return Err(anyhow!("Failed to parse {}: {:?}", file_path, error.kind()));
        }
        Ok(module)
    })
}

/// Parse a standalone expression, such as the operand of a template pipe.
///
/// Returns `None` when the text is not a single valid expression.
pub fn parse_expression(source: &str) -> Option<Box<Expr>> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_map: Lrc<SourceMap> = Default::default();
        let source_file = source_map.new_source_file(FileName::Anon.into(), source.to_string());

        let mut parser = Parser::new(
            Syntax::Typescript(TsSyntax::default()),
            StringInput::from(&*source_file),
            None,
        );

        let expr = parser.parse_expr().ok()?;
        parser.take_errors().is_empty().then_some(expr)
    })
}

fn syntax_for(file_path: &str) -> Syntax {
    let extension = Path::new(file_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    match extension {
        "js" | "jsx" | "mjs" | "cjs" => Syntax::Es(EsSyntax {
            jsx: true,
            decorators: true,
            ..Default::default()
        }),
        _ => Syntax::Typescript(TsSyntax {
            tsx: extension == "tsx",
            decorators: true,
            ..Default::default()
        }),
    }
}

/// Strip wrappers that don't change the runtime value of an expression.
pub fn unwrap_paren(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_paren(&paren.expr),
        Expr::TsAs(ts_as) => unwrap_paren(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_paren(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_paren(&ts_sat.expr),
        Expr::TsNonNull(ts_non_null) => unwrap_paren(&ts_non_null.expr),
        _ => expr,
    }
}

// ============================================================
// Classes
// ============================================================

struct ClassCollector {
    classes: Vec<Class>,
}

impl Visit for ClassCollector {
    fn visit_class(&mut self, node: &Class) {
        self.classes.push(node.clone());
        node.visit_children_with(self);
    }
}

/// Find every class (declarations and class expressions, nested ones included).
pub fn find_class_declarations(module: &Module) -> Vec<Class> {
    let mut collector = ClassCollector {
        classes: Vec::new(),
    };
    module.visit_with(&mut collector);
    collector.classes
}

/// Name of the class property that holds an instance of `type_name`.
///
/// Recognized shapes:
/// - `constructor(private translate: TranslateService)`
/// - `translate: TranslateService;`
/// - `translate = inject(TranslateService);`
pub fn find_class_property_by_type(class: &Class, type_name: &str) -> Option<String> {
    class.body.iter().find_map(|member| match member {
        ClassMember::Constructor(constructor) => {
            constructor.params.iter().find_map(|param| match param {
                ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                    TsParamPropParam::Ident(binding)
                        if type_ann_matches(binding.type_ann.as_deref(), type_name) =>
                    {
                        Some(binding.id.sym.to_string())
                    }
                    _ => None,
                },
                ParamOrTsParamProp::Param(_) => None,
            })
        }
        ClassMember::ClassProp(prop) => {
            let typed = type_ann_matches(prop.type_ann.as_deref(), type_name);
            let injected = prop
                .value
                .as_deref()
                .is_some_and(|value| is_inject_call(value, type_name));
            if typed || injected {
                prop_name(&prop.key)
            } else {
                None
            }
        }
        _ => None,
    })
}

fn type_ann_matches(type_ann: Option<&TsTypeAnn>, type_name: &str) -> bool {
    match type_ann.map(|ann| &*ann.type_ann) {
        Some(TsType::TsTypeRef(type_ref)) => entity_name_matches(&type_ref.type_name, type_name),
        _ => false,
    }
}

fn entity_name_matches(name: &TsEntityName, type_name: &str) -> bool {
    match name {
        TsEntityName::Ident(ident) => &*ident.sym == type_name,
        // `i18n.TranslateService`
        TsEntityName::TsQualifiedName(qualified) => &*qualified.right.sym == type_name,
    }
}

/// `inject(TranslateService)`
fn is_inject_call(expr: &Expr, type_name: &str) -> bool {
    let Expr::Call(call) = unwrap_paren(expr) else {
        return false;
    };
    callee_ident(&call.callee) == Some("inject")
        && call
            .args
            .first()
            .is_some_and(|arg| matches!(unwrap_paren(&arg.expr), Expr::Ident(ident) if &*ident.sym == type_name))
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(|s| s.to_string()),
        _ => None,
    }
}

fn callee_ident(callee: &Callee) -> Option<&str> {
    match callee {
        Callee::Expr(expr) => match unwrap_paren(expr) {
            Expr::Ident(ident) => Some(&*ident.sym),
            _ => None,
        },
        _ => None,
    }
}

// ============================================================
// Calls
// ============================================================

struct MethodCallCollector<'a> {
    property: &'a str,
    methods: &'a [String],
    /// The property is a constructor parameter property, so the bare
    /// parameter name refers to it inside the constructor body.
    parameter_property: bool,
    in_constructor: bool,
    calls: Vec<CallExpr>,
}

impl MethodCallCollector<'_> {
    /// `this.<property>`, or a bare `<property>` inside the constructor that declares it.
    fn is_property_access(&self, expr: &Expr) -> bool {
        match unwrap_paren(expr) {
            Expr::Member(member) => {
                matches!(&*member.obj, Expr::This(_))
                    && matches!(&member.prop, MemberProp::Ident(prop) if &*prop.sym == self.property)
            }
            Expr::Ident(ident) => {
                self.parameter_property && self.in_constructor && &*ident.sym == self.property
            }
            _ => false,
        }
    }
}

impl Visit for MethodCallCollector<'_> {
    fn visit_constructor(&mut self, node: &Constructor) {
        let outer = self.in_constructor;
        self.in_constructor = true;
        node.visit_children_with(self);
        self.in_constructor = outer;
    }

    // Nested functions and classes get their own scope.
    fn visit_function(&mut self, node: &Function) {
        let outer = self.in_constructor;
        self.in_constructor = false;
        node.visit_children_with(self);
        self.in_constructor = outer;
    }

    fn visit_class(&mut self, node: &Class) {
        let outer = self.in_constructor;
        self.in_constructor = false;
        node.visit_children_with(self);
        self.in_constructor = outer;
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Callee::Expr(callee) = &node.callee
            && let Expr::Member(member) = unwrap_paren(callee)
            && let MemberProp::Ident(method) = &member.prop
            && self.methods.iter().any(|name| name.as_str() == &*method.sym)
            && self.is_property_access(&member.obj)
        {
            self.calls.push(node.clone());
        }
        node.visit_children_with(self);
    }
}

/// Find calls of the form `this.<property>.<method>(...)` inside a class.
///
/// When `property` is a constructor parameter property, `<property>.<method>(...)`
/// in the constructor body counts as well.
pub fn find_method_call_expressions(
    class: &Class,
    property: &str,
    methods: &[String],
) -> Vec<CallExpr> {
    let mut collector = MethodCallCollector {
        property,
        methods,
        parameter_property: is_constructor_parameter_property(class, property),
        in_constructor: false,
        calls: Vec::new(),
    };
    class.visit_with(&mut collector);
    collector.calls
}

/// `constructor(private <name>: ...)`
fn is_constructor_parameter_property(class: &Class, name: &str) -> bool {
    class.body.iter().any(|member| match member {
        ClassMember::Constructor(constructor) => constructor.params.iter().any(|param| {
            matches!(
                param,
                ParamOrTsParamProp::TsParamProp(prop)
                    if matches!(&prop.param, TsParamPropParam::Ident(binding) if &*binding.id.sym == name)
            )
        }),
        _ => false,
    })
}

struct FunctionCallCollector<'a> {
    names: &'a [String],
    calls: Vec<CallExpr>,
}

impl Visit for FunctionCallCollector<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Some(name) = callee_ident(&node.callee)
            && self.names.iter().any(|n| n == name)
        {
            self.calls.push(node.clone());
        }
        node.visit_children_with(self);
    }
}

/// Find calls to any of the given plain function names, anywhere in the module.
pub fn find_function_call_expressions(module: &Module, names: &[String]) -> Vec<CallExpr> {
    let mut collector = FunctionCallCollector {
        names,
        calls: Vec::new(),
    };
    module.visit_with(&mut collector);
    collector.calls
}

/// Local names under which `imported_name` is imported, e.g. `_` for
/// `import { marker as _ } from '...'`.
pub fn find_named_import_aliases(module: &Module, imported_name: &str) -> Vec<String> {
    module
        .body
        .iter()
        .filter_map(|item| match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => Some(import),
            _ => None,
        })
        .flat_map(|import| import.specifiers.iter())
        .filter_map(|specifier| {
            let ImportSpecifier::Named(named) = specifier else {
                return None;
            };
            let imported = match &named.imported {
                Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                Some(ModuleExportName::Str(s)) => s.value.to_string_lossy().to_string(),
                None => named.local.sym.to_string(),
            };
            (imported == imported_name).then(|| named.local.sym.to_string())
        })
        .collect()
}

// ============================================================
// Component templates
// ============================================================

struct ComponentTemplateCollector {
    templates: Vec<String>,
}

impl Visit for ComponentTemplateCollector {
    fn visit_decorator(&mut self, node: &Decorator) {
        if let Expr::Call(call) = unwrap_paren(&node.expr)
            && callee_ident(&call.callee) == Some("Component")
            && let Some(arg) = call.args.first()
            && let Expr::Object(object) = unwrap_paren(&arg.expr)
        {
            for prop in &object.props {
                if let PropOrSpread::Prop(prop) = prop
                    && let Prop::KeyValue(kv) = &**prop
                    && prop_name(&kv.key).as_deref() == Some("template")
                {
                    self.templates.extend(strings_from_expression(&kv.value));
                }
            }
        }
        node.visit_children_with(self);
    }
}

/// Inline templates declared with `@Component({ template: '...' })`.
pub fn find_component_templates(module: &Module) -> Vec<String> {
    let mut collector = ComponentTemplateCollector {
        templates: Vec::new(),
    };
    module.visit_with(&mut collector);
    collector.templates
}

// ============================================================
// Static string evaluation
// ============================================================

/// Literal strings an expression can statically evaluate to.
///
/// - `'A'` and `` `A` `` give `A`
/// - `'A' + 'B'` gives `AB`
/// - `['A', 'B']`, `x ? 'A' : 'B'` and `'A' || 'B'` give both
///
/// Anything dynamic yields nothing.
pub fn strings_from_expression(expr: &Expr) -> Vec<String> {
    match unwrap_paren(expr) {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|s| s.to_string()).into_iter().collect(),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .and_then(|quasi| quasi.cooked.as_ref())
            .and_then(|cooked| cooked.as_str())
            .map(|s| s.to_string())
            .into_iter()
            .collect(),
        Expr::Array(array) => array
            .elems
            .iter()
            .flatten()
            .filter(|elem| elem.spread.is_none())
            .flat_map(|elem| strings_from_expression(&elem.expr))
            .collect(),
        Expr::Bin(bin) => match bin.op {
            BinaryOp::Add => {
                match (single_string(&bin.left), single_string(&bin.right)) {
                    (Some(left), Some(right)) => vec![left + right.as_str()],
                    _ => Vec::new(),
                }
            }
            BinaryOp::LogicalOr => {
                let mut strings = strings_from_expression(&bin.left);
                strings.extend(strings_from_expression(&bin.right));
                strings
            }
            _ => Vec::new(),
        },
        Expr::Cond(cond) => {
            let mut strings = strings_from_expression(&cond.cons);
            strings.extend(strings_from_expression(&cond.alt));
            strings
        }
        _ => Vec::new(),
    }
}

fn single_string(expr: &Expr) -> Option<String> {
    let mut strings = strings_from_expression(expr);
    if strings.len() == 1 { strings.pop() } else { None }
}

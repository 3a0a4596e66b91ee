use mcexpr::{expr::Expr, interval::AnalysisScope};

use crate::action::Action;

/// Analysis scope of an action tree: every expression it holds, and an
/// assignment edge for every `x := y` between two direct references.
pub fn collect_analysis_scope(action: &Action) -> AnalysisScope<'_> {
    let mut scope = AnalysisScope::new();
    for node in action.descendants() {
        for expr in node.expressions() {
            scope.add_expression(expr);
        }
        if let Action::Assignment {
            lhs: Expr::Ref(target),
            rhs: Expr::Ref(source),
        } = node
        {
            scope.add_assignment(*target, *source);
        }
    }
    scope
}

use fold_encoding_expr::expr::{
    add,
    eval::{eval_layer, eval_layer_checked, write, EvalError},
    lit, neg,
    pattern::push_neg,
    ExprFrame,
};
use fold_encoding_visualize::visualize::FevVizExt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    {
        let expr = neg(add(lit(1), neg(lit(2))));

        let (evaluated, viz) = expr.fold_v(eval_layer);
        assert_eq!(evaluated, 1);

        viz.label("Evaluate Expr", write(&expr)).write("eval.json")?;

        let rewritten = push_neg(&expr);
        let (_, before) = expr.fold_v(write_layer);
        let (_, after) = rewritten.fold_v(write_layer);

        before
            .label("Print Expr", write(&expr))
            .fuse(after, "Print After push_neg", write(&rewritten))
            .write("push_neg.json")?;
    }

    {
        let valid_expr = add(lit(1), neg(lit(7)));
        let invalid_expr = add(neg(lit(i64::MIN)), lit(3));

        let (valid_res, valid_viz) = valid_expr.try_fold_v(eval_layer_checked);
        let (invalid_res, invalid_viz) = invalid_expr.try_fold_v(eval_layer_checked);

        assert_eq!(valid_res, Ok(-6));
        assert_eq!(invalid_res, Err(EvalError::NegOverflow(i64::MIN)));

        valid_viz
            .label("Checked Eval Valid Expr", write(&valid_expr))
            .write("eval_checked_valid.json")?;
        invalid_viz
            .label("Checked Eval Overflowing Expr", write(&invalid_expr))
            .write("eval_checked_invalid.json")?;
    }

    Ok(())
}

fn write_layer(frame: ExprFrame<String>) -> String {
    match frame {
        ExprFrame::Lit(x) => x.to_string(),
        ExprFrame::Neg(a) => format!("(-{})", a),
        ExprFrame::Add(a, b) => format!("({}+{})", a, b),
    }
}

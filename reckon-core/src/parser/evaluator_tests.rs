#[cfg(test)]
mod function_scope_tests {
    use crate::parser::{EvalError, Evaluator, SymbolEntry};

    fn result(evaluator: &mut Evaluator, input: &str) -> f64 {
        evaluator.evaluate(input).unwrap().result.unwrap()
    }

    #[test]
    fn test_parameter_does_not_leak() {
        let mut evaluator = Evaluator::new();
        evaluator.evaluate("x=4-1").unwrap();

        let declared = evaluator.evaluate("f(x)=abs(x)+1").unwrap();
        assert_eq!(declared.result, None);
        assert_eq!(declared.symbols.variable("x"), Some(3.0));

        let called = evaluator.evaluate("f(-5)").unwrap();
        assert_eq!(called.result, Some(6.0));
        assert_eq!(called.symbols.variable("x"), Some(3.0));
    }

    #[test]
    fn test_declared_body_is_serialized() {
        let mut evaluator = Evaluator::new();
        evaluator.evaluate("f(x) = 4 * x ^ -x").unwrap();
        evaluator.evaluate("g(t)=1+f(t-1)").unwrap();

        match evaluator.symbols().get("f") {
            Some(SymbolEntry::UserFunction(f)) => {
                assert_eq!(f.bound_variable, "x");
                assert_eq!(f.body, "4*x^-x");
            }
            other => panic!("Expected user function, got {:?}", other),
        }
        match evaluator.symbols().get("g") {
            Some(SymbolEntry::UserFunction(g)) => assert_eq!(g.body, "1+f(t-1)"),
            other => panic!("Expected user function, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_calls_see_caller_variables() {
        let mut evaluator = Evaluator::new();
        evaluator.evaluate("f(x)=4*x^-x").unwrap();
        evaluator.evaluate("g(x)=1+f(x-1)").unwrap();
        evaluator.evaluate("y = 2").unwrap();
        evaluator.evaluate("z = 1").unwrap();

        assert_eq!(result(&mut evaluator, "z+2*g(y+f(y))"), 5.0);
    }

    #[test]
    fn test_function_sees_globals() {
        let mut evaluator = Evaluator::new();
        evaluator.evaluate("k=10").unwrap();
        evaluator.evaluate("scale(v)=v*k").unwrap();
        assert_eq!(result(&mut evaluator, "scale(3)"), 30.0);

        // Bodies are looked up at call time
        evaluator.evaluate("k=2").unwrap();
        assert_eq!(result(&mut evaluator, "scale(3)"), 6.0);
    }

    #[test]
    fn test_assignment_inside_argument_is_scoped() {
        let mut evaluator = Evaluator::new();
        evaluator.evaluate("q=1").unwrap();
        assert_eq!(result(&mut evaluator, "abs(q=-7)"), 7.0);
        assert_eq!(evaluator.symbols().variable("q"), Some(1.0));
    }

    #[test]
    fn test_signed_call() {
        let mut evaluator = Evaluator::new();
        evaluator.evaluate("sq(n)=n*n").unwrap();
        assert_eq!(result(&mut evaluator, "-sq(3)"), -9.0);
        assert_eq!(result(&mut evaluator, "2*+sq(3)"), 18.0);
        assert_eq!(result(&mut evaluator, "-abs(-2)"), -2.0);
    }

    #[test]
    fn test_recursive_function_terminates_through_builtins() {
        let mut evaluator = Evaluator::new();
        evaluator.evaluate("h(n)=n+1").unwrap();
        evaluator.evaluate("h2(n)=h(h(n))").unwrap();
        assert_eq!(result(&mut evaluator, "h2(1)"), 3.0);
    }

    #[test]
    fn test_function_name_used_as_variable() {
        let mut evaluator = Evaluator::new();
        assert_eq!(
            evaluator.evaluate("sin + 1").unwrap_err(),
            EvalError::unknown("sin")
        );
    }

    #[test]
    fn test_variable_with_call_syntax_yields_value() {
        let mut evaluator = Evaluator::new();
        assert_eq!(result(&mut evaluator, "pi(2)"), std::f64::consts::PI);
        // The argument is never evaluated
        assert_eq!(result(&mut evaluator, "-pi(1/nope)"), -std::f64::consts::PI);

        evaluator.evaluate("x=4").unwrap();
        assert_eq!(result(&mut evaluator, "1 + x (3)"), 5.0);
    }

    #[test]
    fn test_unknown_function() {
        let mut evaluator = Evaluator::new();
        assert_eq!(
            evaluator.evaluate("1 + nope(2)").unwrap_err(),
            EvalError::unknown("nope")
        );
    }

    #[test]
    fn test_error_inside_body_propagates() {
        let mut evaluator = Evaluator::new();
        evaluator.evaluate("bad(x)=x+missing").unwrap();
        assert_eq!(
            evaluator.evaluate("1+bad(2)").unwrap_err(),
            EvalError::unknown("missing")
        );
    }
}

#[cfg(test)]
mod assignment_tests {
    use crate::parser::{EvalError, Evaluator};

    #[test]
    fn test_chained_assignment() {
        let mut evaluator = Evaluator::new();
        let outcome = evaluator.evaluate("a=b=3").unwrap();
        assert_eq!(outcome.message.as_deref(), Some("set a to 3"));
        assert_eq!(evaluator.symbols().variable("a"), Some(3.0));
        assert_eq!(evaluator.symbols().variable("b"), Some(3.0));
    }

    #[test]
    fn test_failed_assignment_leaves_table_untouched() {
        let mut evaluator = Evaluator::new();
        evaluator.evaluate("x=1").unwrap();

        assert!(evaluator.evaluate("x=2+nothing").is_err());
        assert_eq!(evaluator.symbols().variable("x"), Some(1.0));

        assert!(evaluator.evaluate("y=1+").is_err());
        assert!(!evaluator.symbols().contains("y"));
    }

    #[test]
    fn test_declaration_as_right_hand_side() {
        let mut evaluator = Evaluator::new();
        assert_eq!(
            evaluator.evaluate("x=f(t)=t").unwrap_err(),
            EvalError::malformed("=")
        );
        assert!(!evaluator.symbols().contains("x"));
        assert!(!evaluator.symbols().contains("f"));
    }

    #[test]
    fn test_declaration_as_call_argument() {
        let mut evaluator = Evaluator::new();
        assert_eq!(
            evaluator.evaluate("abs(g(t)=t)").unwrap_err(),
            EvalError::malformed("=")
        );
        assert!(!evaluator.symbols().contains("g"));
    }

    #[test]
    fn test_declaration_as_function_body() {
        let mut evaluator = Evaluator::new();
        assert_eq!(
            evaluator.evaluate("f(x)=g(y)=y").unwrap_err(),
            EvalError::malformed("=")
        );
        assert!(!evaluator.symbols().contains("f"));
        assert!(!evaluator.symbols().contains("g"));
    }

    #[test]
    fn test_redeclare_variable_as_function() {
        let mut evaluator = Evaluator::new();
        evaluator.evaluate("f=2").unwrap();
        evaluator.evaluate("f(x)=x*3").unwrap();
        assert_eq!(evaluator.evaluate("f(2)").unwrap().result, Some(6.0));
        assert_eq!(
            evaluator.evaluate("f+1").unwrap_err(),
            EvalError::unknown("f")
        );
    }

    #[test]
    fn test_empty_inputs() {
        let mut evaluator = Evaluator::new();
        assert_eq!(evaluator.evaluate("").unwrap_err(), EvalError::EmptyExpression);
        assert_eq!(evaluator.evaluate("   ").unwrap_err(), EvalError::EmptyExpression);
        assert_eq!(evaluator.evaluate("x=").unwrap_err(), EvalError::EmptyExpression);
        assert_eq!(evaluator.evaluate("f(x)=").unwrap_err(), EvalError::EmptyExpression);
        assert_eq!(evaluator.evaluate("abs()").unwrap_err(), EvalError::EmptyExpression);
    }

    #[test]
    fn test_reset_restores_builtins() {
        let mut evaluator = Evaluator::new();
        evaluator.evaluate("pi=3").unwrap();
        evaluator.reset();
        assert_eq!(evaluator.symbols().variable("pi"), Some(std::f64::consts::PI));
    }
}

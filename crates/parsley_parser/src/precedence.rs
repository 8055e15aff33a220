//! Operator precedence and the token-to-operator tables.

use parsley_ast::{AssignmentOperator, BinaryOperator, LogicalOperator, UnaryOperator, UpdateOperator};
use parsley_scanner::TokenKind;

/// Binary operator precedence levels, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperatorPrecedence {
    Lowest = 0,
    NullishCoalescing = 1,
    LogicalOr = 2,
    LogicalAnd = 3,
    BitwiseOr = 4,
    BitwiseXor = 5,
    BitwiseAnd = 6,
    Equality = 7,
    /// Also `as` and `satisfies`.
    Relational = 8,
    Shift = 9,
    Additive = 10,
    Multiplicative = 11,
    Exponentiation = 12,
}

/// The precedence of a binary operator token, or `None` if it is not one.
pub fn binary_precedence(kind: TokenKind) -> Option<OperatorPrecedence> {
    use TokenKind::*;
    Some(match kind {
        QuestionQuestion => OperatorPrecedence::NullishCoalescing,
        BarBar => OperatorPrecedence::LogicalOr,
        AmpAmp => OperatorPrecedence::LogicalAnd,
        Bar => OperatorPrecedence::BitwiseOr,
        Caret => OperatorPrecedence::BitwiseXor,
        Amp => OperatorPrecedence::BitwiseAnd,
        EqEq | NotEq | EqEqEq | NotEqEq => OperatorPrecedence::Equality,
        Lt | Gt | LtEq | GtEq | Instanceof | In => OperatorPrecedence::Relational,
        LtLt | GtGt | GtGtGt => OperatorPrecedence::Shift,
        Plus | Minus => OperatorPrecedence::Additive,
        Star | Slash | Percent => OperatorPrecedence::Multiplicative,
        StarStar => OperatorPrecedence::Exponentiation,
        _ => return None,
    })
}

/// What a binary-precedence token builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryKind {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
}

pub fn binary_operator(kind: TokenKind) -> Option<BinaryKind> {
    use BinaryOperator as B;
    use TokenKind::*;
    Some(BinaryKind::Binary(match kind {
        QuestionQuestion => return Some(BinaryKind::Logical(LogicalOperator::Coalesce)),
        BarBar => return Some(BinaryKind::Logical(LogicalOperator::Or)),
        AmpAmp => return Some(BinaryKind::Logical(LogicalOperator::And)),
        Bar => B::BitwiseOr,
        Caret => B::BitwiseXor,
        Amp => B::BitwiseAnd,
        EqEq => B::Equality,
        NotEq => B::Inequality,
        EqEqEq => B::StrictEquality,
        NotEqEq => B::StrictInequality,
        Lt => B::LessThan,
        Gt => B::GreaterThan,
        LtEq => B::LessEqual,
        GtEq => B::GreaterEqual,
        Instanceof => B::Instanceof,
        In => B::In,
        LtLt => B::ShiftLeft,
        GtGt => B::ShiftRight,
        GtGtGt => B::ShiftRightZeroFill,
        Plus => B::Addition,
        Minus => B::Subtraction,
        Star => B::Multiplication,
        Slash => B::Division,
        Percent => B::Remainder,
        StarStar => B::Exponential,
        _ => return None,
    }))
}

pub fn assignment_operator(kind: TokenKind) -> Option<AssignmentOperator> {
    use AssignmentOperator as A;
    use TokenKind::*;
    Some(match kind {
        Eq => A::Assign,
        PlusEq => A::Addition,
        MinusEq => A::Subtraction,
        StarEq => A::Multiplication,
        SlashEq => A::Division,
        PercentEq => A::Remainder,
        StarStarEq => A::Exponential,
        LtLtEq => A::ShiftLeft,
        GtGtEq => A::ShiftRight,
        GtGtGtEq => A::ShiftRightZeroFill,
        BarEq => A::BitwiseOr,
        CaretEq => A::BitwiseXor,
        AmpEq => A::BitwiseAnd,
        BarBarEq => A::LogicalOr,
        AmpAmpEq => A::LogicalAnd,
        QuestionQuestionEq => A::LogicalNullish,
        _ => return None,
    })
}

pub fn unary_operator(kind: TokenKind) -> Option<UnaryOperator> {
    Some(match kind {
        TokenKind::Minus => UnaryOperator::Minus,
        TokenKind::Plus => UnaryOperator::Plus,
        TokenKind::Bang => UnaryOperator::LogicalNot,
        TokenKind::Tilde => UnaryOperator::BitwiseNot,
        TokenKind::Typeof => UnaryOperator::Typeof,
        TokenKind::Void => UnaryOperator::Void,
        TokenKind::Delete => UnaryOperator::Delete,
        _ => return None,
    })
}

pub fn update_operator(kind: TokenKind) -> Option<UpdateOperator> {
    match kind {
        TokenKind::PlusPlus => Some(UpdateOperator::Increment),
        TokenKind::MinusMinus => Some(UpdateOperator::Decrement),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        let prec = |k| binary_precedence(k).unwrap();
        assert!(prec(TokenKind::Star) > prec(TokenKind::Plus));
        assert!(prec(TokenKind::Plus) > prec(TokenKind::LtLt));
        assert!(prec(TokenKind::AmpAmp) > prec(TokenKind::BarBar));
        assert!(prec(TokenKind::BarBar) > prec(TokenKind::QuestionQuestion));
        assert!(binary_precedence(TokenKind::Eq).is_none());
    }

    #[test]
    fn test_operator_tables() {
        assert_eq!(
            binary_operator(TokenKind::AmpAmp),
            Some(BinaryKind::Logical(LogicalOperator::And))
        );
        assert_eq!(
            binary_operator(TokenKind::GtGtGt),
            Some(BinaryKind::Binary(BinaryOperator::ShiftRightZeroFill))
        );
        assert_eq!(assignment_operator(TokenKind::QuestionQuestionEq), Some(AssignmentOperator::LogicalNullish));
        assert_eq!(unary_operator(TokenKind::Typeof), Some(UnaryOperator::Typeof));
        assert!(update_operator(TokenKind::Plus).is_none());
    }
}

//! Rowan language implementation for CS source
//!
//! Connects [`CsSyntaxKind`] to Rowan's generic CST infrastructure.

use rowan::Language;

use super::CsSyntaxKind;

/// Language implementation for CS source
///
/// Zero-sized type implementing `rowan::Language` so the syntax kinds plug
/// into Rowan's generic tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CsLanguage;

/// Red-tree node over the CS green tree.
pub type CsSyntaxNode = rowan::SyntaxNode<CsLanguage>;
/// Red-tree token over the CS green tree.
pub type CsSyntaxToken = rowan::SyntaxToken<CsLanguage>;
/// Node-or-token element.
pub type CsSyntaxElement = rowan::SyntaxElement<CsLanguage>;

impl Language for CsLanguage {
    type Kind = CsSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match raw.0 {
            // Trivia
            0 => CsSyntaxKind::Whitespace,
            1 => CsSyntaxKind::CommentLine,
            2 => CsSyntaxKind::CommentBlock,
            3 => CsSyntaxKind::Newline,
            4 => CsSyntaxKind::Directive,

            // Keywords (10-59)
            10 => CsSyntaxKind::ClassKw,
            11 => CsSyntaxKind::NamespaceKw,
            12 => CsSyntaxKind::UsingKw,
            13 => CsSyntaxKind::ReturnKw,
            14 => CsSyntaxKind::IfKw,
            15 => CsSyntaxKind::ElseKw,
            16 => CsSyntaxKind::WhileKw,
            17 => CsSyntaxKind::DoKw,
            18 => CsSyntaxKind::ForKw,
            19 => CsSyntaxKind::ForeachKw,
            20 => CsSyntaxKind::SwitchKw,
            21 => CsSyntaxKind::CaseKw,
            22 => CsSyntaxKind::DefaultKw,
            23 => CsSyntaxKind::BreakKw,
            24 => CsSyntaxKind::ContinueKw,
            25 => CsSyntaxKind::GetKw,
            26 => CsSyntaxKind::SetKw,
            27 => CsSyntaxKind::VoidKw,
            28 => CsSyntaxKind::ThrowKw,
            29 => CsSyntaxKind::NewKw,
            30 => CsSyntaxKind::VarKw,
            31 => CsSyntaxKind::TrueKw,
            32 => CsSyntaxKind::FalseKw,
            33 => CsSyntaxKind::NullKw,
            40 => CsSyntaxKind::PublicKw,
            41 => CsSyntaxKind::PrivateKw,
            42 => CsSyntaxKind::ProtectedKw,
            43 => CsSyntaxKind::InternalKw,
            44 => CsSyntaxKind::StaticKw,
            45 => CsSyntaxKind::ReadonlyKw,
            46 => CsSyntaxKind::OverrideKw,
            47 => CsSyntaxKind::VirtualKw,
            48 => CsSyntaxKind::AbstractKw,
            49 => CsSyntaxKind::SealedKw,

            // Punctuation (100-149)
            100 => CsSyntaxKind::LBrace,
            101 => CsSyntaxKind::RBrace,
            102 => CsSyntaxKind::LParen,
            103 => CsSyntaxKind::RParen,
            104 => CsSyntaxKind::LBracket,
            105 => CsSyntaxKind::RBracket,
            106 => CsSyntaxKind::Semicolon,
            107 => CsSyntaxKind::Comma,
            108 => CsSyntaxKind::Dot,
            109 => CsSyntaxKind::Colon,
            110 => CsSyntaxKind::Arrow,
            111 => CsSyntaxKind::Eq,
            112 => CsSyntaxKind::EqEq,
            113 => CsSyntaxKind::Neq,
            114 => CsSyntaxKind::Lt,
            115 => CsSyntaxKind::Gt,
            116 => CsSyntaxKind::LtEq,
            117 => CsSyntaxKind::GtEq,
            118 => CsSyntaxKind::AmpAmp,
            119 => CsSyntaxKind::PipePipe,
            120 => CsSyntaxKind::Bang,
            121 => CsSyntaxKind::Plus,
            122 => CsSyntaxKind::Minus,
            123 => CsSyntaxKind::Star,
            124 => CsSyntaxKind::Slash,
            125 => CsSyntaxKind::Percent,
            126 => CsSyntaxKind::Question,

            // Literals & identifiers (150-159)
            150 => CsSyntaxKind::Ident,
            151 => CsSyntaxKind::IntLiteral,
            152 => CsSyntaxKind::StringLiteral,
            153 => CsSyntaxKind::CharLiteral,

            // Structure nodes (200-229)
            200 => CsSyntaxKind::SourceFile,
            201 => CsSyntaxKind::UsingDirective,
            202 => CsSyntaxKind::NamespaceDecl,
            203 => CsSyntaxKind::ClassDecl,
            210 => CsSyntaxKind::MethodDecl,
            211 => CsSyntaxKind::PropertyDecl,
            212 => CsSyntaxKind::FieldDecl,
            213 => CsSyntaxKind::ParamList,
            214 => CsSyntaxKind::Param,
            215 => CsSyntaxKind::AttributeList,
            216 => CsSyntaxKind::Attribute,
            217 => CsSyntaxKind::AccessorList,
            218 => CsSyntaxKind::AccessorDecl,
            219 => CsSyntaxKind::ArrowClause,
            220 => CsSyntaxKind::QualifiedName,
            221 => CsSyntaxKind::TypeRef,

            // Statement nodes (230-259)
            230 => CsSyntaxKind::Block,
            231 => CsSyntaxKind::ReturnStmt,
            232 => CsSyntaxKind::ExprStmt,
            233 => CsSyntaxKind::IfStmt,
            234 => CsSyntaxKind::ElseClause,
            235 => CsSyntaxKind::WhileStmt,
            236 => CsSyntaxKind::DoStmt,
            237 => CsSyntaxKind::UsingStmt,
            238 => CsSyntaxKind::SwitchStmt,
            239 => CsSyntaxKind::ThrowStmt,
            240 => CsSyntaxKind::LocalDeclStmt,
            241 => CsSyntaxKind::BreakStmt,
            242 => CsSyntaxKind::ContinueStmt,
            243 => CsSyntaxKind::EmptyStmt,

            // Expression nodes (260-279)
            260 => CsSyntaxKind::LiteralExpr,
            261 => CsSyntaxKind::NameExpr,
            262 => CsSyntaxKind::ParenExpr,
            263 => CsSyntaxKind::UnaryExpr,
            264 => CsSyntaxKind::BinaryExpr,
            265 => CsSyntaxKind::CallExpr,
            266 => CsSyntaxKind::MemberExpr,
            267 => CsSyntaxKind::ObjectCreationExpr,
            268 => CsSyntaxKind::ArgList,

            // Special tokens (400+)
            400 => CsSyntaxKind::Error,
            401 => CsSyntaxKind::Eof,

            // Anything else the host hands us
            _ => CsSyntaxKind::Unknown,
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

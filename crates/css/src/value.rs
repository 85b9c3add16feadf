use cssparser::{ParseError, Parser, ParserInput, ToCss, Token};
use varguard_core::is_custom_property_name;

/// 声明值语法树节点
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    /// 函数调用：`var(...)`、`calc(...)`
    Function { name: String, args: Vec<ValueNode> },
    /// 标识符；`is_variable` 表示它本身就是一个自定义属性名
    Word { text: String, is_variable: bool },
    /// 分隔符：`,`、`/`、`+` 等
    Punctuation(char),
    /// 其他 token（数字、字符串、括号块……），括号块带子节点
    Other { text: String, children: Vec<ValueNode> },
}

impl ValueNode {
    /// 子节点（无子节点时为空切片）
    pub fn children(&self) -> &[ValueNode] {
        match self {
            ValueNode::Function { args, .. } => args,
            ValueNode::Other { children, .. } => children,
            ValueNode::Word { .. } | ValueNode::Punctuation(_) => &[],
        }
    }

    /// 是否为 `var(<custom-property-name> ...)` 调用
    pub fn is_var_function(&self) -> bool {
        match self {
            ValueNode::Function { name, args } => {
                name == "var"
                    && matches!(args.first(), Some(ValueNode::Word { is_variable: true, .. }))
            }
            _ => false,
        }
    }
}

/// 解析声明值为节点列表
///
/// 空白和注释会被跳过，解析从不失败：无法识别的 token 作为 `Other` 保留
///
/// # 示例
///
/// ```
/// use varguard_css::{parse_value, ValueNode};
///
/// let nodes = parse_value("var(--gap, 4px)");
/// assert_eq!(nodes.len(), 1);
/// assert!(nodes[0].is_var_function());
/// ```
pub fn parse_value(value: &str) -> Vec<ValueNode> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    parse_nodes(&mut parser)
}

fn parse_nodes(input: &mut Parser<'_, '_>) -> Vec<ValueNode> {
    let mut nodes = Vec::new();

    while let Ok(token) = input.next() {
        let token = token.clone();
        let node = match token {
            Token::Function(name) => ValueNode::Function {
                name: name.to_string(),
                args: parse_block(input),
            },
            Token::ParenthesisBlock => block_node("()", input),
            Token::SquareBracketBlock => block_node("[]", input),
            Token::CurlyBracketBlock => block_node("{}", input),
            Token::Ident(text) => ValueNode::Word {
                is_variable: is_custom_property_name(&text),
                text: text.to_string(),
            },
            Token::Comma => ValueNode::Punctuation(','),
            Token::Colon => ValueNode::Punctuation(':'),
            Token::Semicolon => ValueNode::Punctuation(';'),
            Token::Delim(ch) => ValueNode::Punctuation(ch),
            other => ValueNode::Other {
                text: other.to_css_string(),
                children: Vec::new(),
            },
        };
        nodes.push(node);
    }

    nodes
}

fn block_node(text: &str, input: &mut Parser<'_, '_>) -> ValueNode {
    ValueNode::Other {
        text: text.to_string(),
        children: parse_block(input),
    }
}

fn parse_block<'i>(input: &mut Parser<'i, '_>) -> Vec<ValueNode> {
    input
        .parse_nested_block(|inner| Ok::<_, ParseError<'i, ()>>(parse_nodes(inner)))
        .unwrap_or_default()
}

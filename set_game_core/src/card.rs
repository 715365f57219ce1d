use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

// --- 核心数据结构定义 ---

/// 一副完整牌组的张数：4 种属性，每种 3 个取值，3^4 = 81
pub const DECK_SIZE: usize = 81;

/// 颜色 (Color)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Purple,
}

/// 形状 (Shape)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Oval,
    Squiggle,
    Diamond,
}

/// 填充 (Fill)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    Open,
    Striped,
    Solid,
}

/// 图案数量 (Count)
/// 在线上传输时是数字 1/2/3，而不是变体名
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum Count {
    One,
    Two,
    Three,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Purple];
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Oval, Shape::Squiggle, Shape::Diamond];
}

impl Fill {
    pub const ALL: [Fill; 3] = [Fill::Open, Fill::Striped, Fill::Solid];
}

impl Count {
    pub const ALL: [Count; 3] = [Count::One, Count::Two, Count::Three];

    pub fn value(self) -> u8 {
        match self {
            Count::One => 1,
            Count::Two => 2,
            Count::Three => 3,
        }
    }

    pub fn from_value(value: u8) -> Option<Count> {
        match value {
            1 => Some(Count::One),
            2 => Some(Count::Two),
            3 => Some(Count::Three),
            _ => None,
        }
    }
}

impl Serialize for Count {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        Count::from_value(value)
            .ok_or_else(|| serde::de::Error::custom(format!("图案数量必须是 1..=3，收到 {}", value)))
    }
}

/// 牌的唯一标识，在整副牌的生命周期内保持不变
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u8);

/// 单张卡牌 (Card)
///
/// 构造后不可修改。相等性只看 `id`：两张属性完全相同但 id 不同的牌
/// 被视为不同的牌（测试里手工构造的牌可能出现这种情况）。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    color: Color,
    shape: Shape,
    fill: Fill,
    count: Count,
}

impl Card {
    pub fn new(id: CardId, color: Color, shape: Shape, fill: Fill, count: Count) -> Card {
        Card { id, color, shape, fill, count }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn fill(&self) -> Fill {
        self.fill
    }

    pub fn count(&self) -> Count {
        self.count
    }

    /// 卡图文件名，例如 `red_oval_1_open.png`
    pub fn image_name(&self) -> String {
        format!(
            "{}_{}_{}_{}.png",
            self.color.key(),
            self.shape.key(),
            self.count.value(),
            self.fill.key()
        )
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// --- 实现辅助功能 ---

impl Color {
    fn key(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Purple => "purple",
        }
    }
}

impl Shape {
    fn key(self) -> &'static str {
        match self {
            Shape::Oval => "oval",
            Shape::Squiggle => "squiggle",
            Shape::Diamond => "diamond",
        }
    }
}

impl Fill {
    fn key(self) -> &'static str {
        match self {
            Fill::Open => "open",
            Fill::Striped => "striped",
            Fill::Solid => "solid",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Purple => "Purple",
        })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Shape::Oval => "Oval",
            Shape::Squiggle => "Squiggle",
            Shape::Diamond => "Diamond",
        })
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Fill::Open => "Open",
            Fill::Striped => "Striped",
            Fill::Solid => "Solid",
        })
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Count::One => "One",
            Count::Two => "Two",
            Count::Three => "Three",
        })
    }
}

/// 显示顺序：颜色 形状 数量 填充，例如 "Red Oval One Open"
impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {} {}", self.color, self.shape, self.count, self.fill)
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_by_id() {
        let a = Card::new(CardId(1), Color::Red, Shape::Oval, Fill::Open, Count::One);
        let same_attrs = Card::new(CardId(2), Color::Red, Shape::Oval, Fill::Open, Count::One);
        let same_id = Card::new(CardId(1), Color::Green, Shape::Diamond, Fill::Solid, Count::Three);
        assert_ne!(a, same_attrs);
        assert_eq!(a, same_id);
    }

    #[test]
    fn test_display_and_image_name() {
        let card = Card::new(CardId(7), Color::Purple, Shape::Squiggle, Fill::Striped, Count::Two);
        assert_eq!(card.to_string(), "Purple Squiggle Two Striped");
        assert_eq!(card.image_name(), "purple_squiggle_2_striped.png");
    }

    #[test]
    fn test_wire_format() {
        let card = Card::new(CardId(0), Color::Red, Shape::Oval, Fill::Open, Count::Three);
        let json = serde_json::to_value(card).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 0, "color": "red", "shape": "oval", "fill": "open", "count": 3})
        );
    }

    #[test]
    fn test_count_rejects_out_of_domain() {
        let bad = r#"{"id": 0, "color": "red", "shape": "oval", "fill": "open", "count": 4}"#;
        assert!(serde_json::from_str::<Card>(bad).is_err());
    }
}

use crate::card::{Card, CardId, Color, Count, DECK_SIZE, Fill, Shape};
use rand::prelude::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

/// 牌堆 (Deck)
///
/// `cards` 的队首就是下一张要发的牌。
/// 任何时候都满足 `remaining() + drawn() == DECK_SIZE`。
/// 发出的牌不会再回到牌堆，所以同一个 id 最多发出一次。
#[derive(Debug, Clone)]
pub struct Deck {
    cards: VecDeque<Card>,
    drawn: usize,
}

/// 按 颜色 → 形状 → 填充 → 数量 的顺序生成全部 81 张牌，id 依次为 0..81
pub fn create_universe() -> Vec<Card> {
    let mut cards = Vec::with_capacity(DECK_SIZE);
    for &color in &Color::ALL {
        for &shape in &Shape::ALL {
            for &fill in &Fill::ALL {
                for &count in &Count::ALL {
                    let id = CardId(cards.len() as u8);
                    cards.push(Card::new(id, color, shape, fill, count));
                }
            }
        }
    }
    cards
}

impl Deck {
    /// 洗好的新牌堆
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Deck {
        let mut cards = create_universe();
        cards.shuffle(rng);
        Deck { cards: cards.into(), drawn: 0 }
    }

    /// 未洗牌的新牌堆，发牌顺序与 `create_universe` 相同
    pub fn ordered() -> Deck {
        Deck { cards: create_universe().into(), drawn: 0 }
    }

    /// 用指定顺序的牌构造牌堆，不在其中的牌视为已经发出
    pub fn from_cards(cards: Vec<Card>) -> Deck {
        let drawn = DECK_SIZE.saturating_sub(cards.len());
        Deck { cards: cards.into(), drawn }
    }

    /// 从队首最多发 `n` 张牌。
    /// 牌不够时返回的张数少于 `n`（可能为 0），调用方据此判断牌堆已空。
    pub fn draw(&mut self, n: usize) -> Vec<Card> {
        let take = n.min(self.cards.len());
        let cards: Vec<Card> = self.cards.drain(..take).collect();
        self.drawn += cards.len();
        cards
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn drawn(&self) -> usize {
        self.drawn
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// 按发牌顺序查看剩余的牌，不改变牌堆
    pub fn peek(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

// --- 单元测试 ---

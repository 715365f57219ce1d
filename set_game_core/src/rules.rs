use crate::card::Card;

/// 三个桌面位置，始终按从小到大排列
pub type Triple = [usize; 3];

// --- 成组判定 ---

/// 判断三张牌是否构成一组 (Set)
///
/// 对四种属性分别检查：三张牌在该属性上要么全部相同，要么两两不同。
/// 四种属性都满足才算有效。只用到属性的相等比较，与参数顺序无关。
pub fn is_valid_triple(a: &Card, b: &Card, c: &Card) -> bool {
    all_same_or_all_different(a.color(), b.color(), c.color())
        && all_same_or_all_different(a.shape(), b.shape(), c.shape())
        && all_same_or_all_different(a.fill(), b.fill(), c.fill())
        && all_same_or_all_different(a.count(), b.count(), c.count())
}

fn all_same_or_all_different<T: Eq>(a: T, b: T, c: T) -> bool {
    let all_same = a == b && b == c;
    let all_different = a != b && b != c && a != c;
    all_same || all_different
}

// --- 枚举所有有效组合 ---

/// 找出 `cards` 中所有有效的三张组合，返回它们的位置
///
/// 结果按位置字典序升序排列，每个无序组合只出现一次。
/// 唯一性按位置判断，与牌面属性无关。少于 3 张牌时返回空列表。
pub fn find_all_valid_triples(cards: &[Card]) -> Vec<Triple> {
    let slots: Vec<Option<Card>> = cards.iter().copied().map(Some).collect();
    find_valid_triples_in_slots(&slots)
}

/// 与 `find_all_valid_triples` 相同，但桌面上可能有空位 (`None`)。
/// 空位不参与组合，返回的位置是原始的槽位下标。
pub fn find_valid_triples_in_slots(slots: &[Option<Card>]) -> Vec<Triple> {
    let occupied: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter_map(|(pos, slot)| slot.map(|_| pos))
        .collect();

    get_combinations(&occupied, 3)
        .into_iter()
        .filter_map(|combo| {
            let (Some(a), Some(b), Some(c)) = (slots[combo[0]], slots[combo[1]], slots[combo[2]]) else {
                return None;
            };
            is_valid_triple(&a, &b, &c).then_some([combo[0], combo[1], combo[2]])
        })
        .collect()
}

/// 辅助函数：从一个切片中生成所有大小为 k 的组合
/// 输入有序时，输出按字典序排列
fn get_combinations<T: Clone>(data: &[T], k: usize) -> Vec<Vec<T>> {
    if k == 0 {
        return vec![vec![]];
    }
    if data.len() < k {
        return vec![];
    }

    let mut result = vec![];
    let (first, rest) = data.split_at(1);

    // 包含第一个元素的组合
    let mut combinations_with_first = get_combinations(rest, k - 1);
    for combo in &mut combinations_with_first {
        combo.insert(0, first[0].clone());
    }
    result.append(&mut combinations_with_first);

    // 不包含第一个元素的组合
    if data.len() > k {
        let mut combinations_without_first = get_combinations(rest, k);
        result.append(&mut combinations_without_first);
    }

    result
}

/// 测试用的固定牌面
#[cfg(test)]
pub(crate) mod fixtures {
    use crate::card::{Card, Color, Count, DECK_SIZE, Fill, Shape};
    use crate::deck::{create_universe, Deck};

    /// 桌面上只有位置 2、5、9 构成一组的 12 张牌 (按 id 取自完整牌组)
    pub const ONE_SET_IDS: [usize; 12] = [8, 39, 76, 45, 77, 43, 61, 40, 23, 1, 74, 60];

    pub fn tableau_with_one_set() -> Vec<Card> {
        let universe = create_universe();
        ONE_SET_IDS.iter().map(|&id| universe[id]).collect()
    }

    /// 前 12 张就是 `tableau_with_one_set`，其余的牌按原始顺序排在后面
    pub fn deck_with_one_set_on_top() -> Deck {
        let mut cards = tableau_with_one_set();
        cards.extend(create_universe().into_iter().filter(|c| !ONE_SET_IDS.contains(&(c.id().0 as usize))));
        debug_assert_eq!(cards.len(), DECK_SIZE);
        Deck::from_cards(cards)
    }

    /// 每个属性只取前两种值的 16 张牌：任意三张都不成组
    pub fn set_free_cards() -> Vec<Card> {
        create_universe()
            .into_iter()
            .filter(|c| {
                c.color() != Color::Purple
                    && c.shape() != Shape::Diamond
                    && c.fill() != Fill::Solid
                    && c.count() != Count::Three
            })
            .collect()
    }
}

// --- 单元测试 ---

use crate::types::CustomPropertyMapping;

/// 合并两张自定义属性表
///
/// 功能：
/// - 同名属性后者覆盖前者
/// - 保持稳定输出顺序（IndexMap 保留首次插入的位置）
pub fn merge_mappings(
    base: CustomPropertyMapping,
    overlay: CustomPropertyMapping,
) -> CustomPropertyMapping {
    let mut merged = base;
    merge_over(&mut merged, overlay);
    merged
}

/// 将 `overlay` 写入 `target`，同名覆盖
pub fn merge_over(target: &mut CustomPropertyMapping, overlay: CustomPropertyMapping) {
    for (name, value) in overlay {
        target.insert(name, value);
    }
}

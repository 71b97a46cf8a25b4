/*
 * Responsibility
 * - リソースごとの「意味付き ID 型」を宣言する
 * - decode ロジック / extractor 実装は core.rs 側
 */
use super::core::PublicId;

// cats
pub enum CatTag {}
pub type PublicCatId = PublicId<CatTag>;

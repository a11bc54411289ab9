use slotmap::new_key_type;

new_key_type! {
    /// Stable internal identifier of a conformer within a [`super::store::ConformerStore`].
    pub struct ConformerId;
}

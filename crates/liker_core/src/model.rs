pub type CompanyId = i64;
pub type CollectionId = String;
pub type JobId = u64;

/// Read-only cached copy of a company row owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub liked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionMeta {
    pub id: CollectionId,
    pub name: String,
}

/// The `(collection, offset, limit)` triple a page fetch was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub collection_id: CollectionId,
    pub offset: usize,
    pub limit: usize,
}

/// One server page of a collection plus the collection's total count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub collection_id: CollectionId,
    pub collection_name: String,
    pub companies: Vec<Company>,
    pub total: usize,
}

pub const LISTED_PRODUCTS_COLLECTION: &str = "listed-product";

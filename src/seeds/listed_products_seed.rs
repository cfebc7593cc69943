use mongodb::bson::{doc, Document};

/// Catálogo de demonstração usado pelo backend em memória.
/// In production the `listed-product` collection is filled out-of-band.
pub fn default_listed_products() -> Vec<Document> {
    vec![
        doc! {
            "product_name": "Aurora Wireless Headphones",
            "brand": "Sonique",
            "category": "Audio",
            "price": 129.99,
            "image": "https://i.ibb.co/headphones.png",
        },
        doc! {
            "product_name": "Falcon Mini Drone",
            "brand": "SkyWorks",
            "category": "Drones",
            "price": 249.0,
            "image": "https://i.ibb.co/drone.png",
        },
        doc! {
            "product_name": "Orbit Smartwatch 2",
            "brand": "Pulse",
            "category": "Wearables",
            "price": 199.5,
            "image": "https://i.ibb.co/smartwatch.png",
        },
        doc! {
            "product_name": "Nimbus 14 Ultrabook",
            "brand": "Lumen",
            "category": "Laptops",
            "price": 1099.0,
            "image": "https://i.ibb.co/laptop.png",
        },
    ]
}

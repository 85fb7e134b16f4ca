//! Services offered out of the box, written to storage on first start

use crate::models::Service;

struct SeedEntry {
    name: &'static str,
    price: u64,
    image: &'static str,
    description: &'static str,
}

const SEED: &[SeedEntry] = &[
    SeedEntry {
        name: "Desarrollo de sitios Web",
        price: 300,
        image: "assets/img/servicios/Img1.jpg",
        description: "Modern, responsive websites optimized for every device: corporate pages, portfolios and landing pages with clean code and intuitive navigation.",
    },
    SeedEntry {
        name: "Aplicaciones móviles",
        price: 600,
        image: "assets/img/servicios/img2.jpg",
        description: "Native and cross-platform mobile apps for Android and iOS with intuitive interfaces and optimized performance.",
    },
    SeedEntry {
        name: "E-commerce",
        price: 1000,
        image: "assets/img/servicios/img3.jpg",
        description: "Complete online stores with shopping cart, secure payment gateways, inventory management and an admin panel.",
    },
    SeedEntry {
        name: "Análisis de Datos",
        price: 1200,
        image: "assets/img/servicios/img4.jpg",
        description: "Data analysis, visualization and business intelligence that turn your data into insight for strategic decisions.",
    },
    SeedEntry {
        name: "DevOps y CI/CD",
        price: 500,
        image: "assets/img/servicios/img5.jpg",
        description: "DevOps practices, deployment automation, continuous integration and application monitoring.",
    },
    SeedEntry {
        name: "Automatización QA",
        price: 1600,
        image: "assets/img/servicios/img6.jpg",
        description: "Test automation, software testing and quality control for reliable applications.",
    },
    SeedEntry {
        name: "API y Microservicios",
        price: 1000,
        image: "assets/img/servicios/img7.jpg",
        description: "REST and GraphQL APIs, scalable microservice architectures and distributed systems.",
    },
    SeedEntry {
        name: "Ciberseguridad",
        price: 750,
        image: "assets/img/servicios/img8.jpg",
        description: "Security audits, protective measures and consulting to protect your digital infrastructure.",
    },
];

/// The default catalog, ids 1 through 8, all active
pub fn default_services() -> Vec<Service> {
    SEED.iter()
        .zip(1u32..)
        .map(|(entry, id)| Service {
            id,
            name: entry.name.to_string(),
            price: entry.price,
            description: entry.description.to_string(),
            image: entry.image.to_string(),
            quantity: 1,
            active: true,
        })
        .collect()
}

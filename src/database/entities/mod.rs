pub mod coating_categories;
pub mod coatings;
pub mod images;
pub mod material_categories;
pub mod materials;
pub mod shapes;
pub mod users;

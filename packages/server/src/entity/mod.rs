pub mod flower_name;

pub mod coco_map;

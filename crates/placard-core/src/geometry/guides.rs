//! Alignment guides shown while an element is being dragged.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Distance (canvas units) under which two edges count as aligned.
pub const GUIDE_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideOrientation {
    Vertical,
    Horizontal,
}

/// Which reference line of the moving element matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideEdge {
    Left,
    Right,
    CenterX,
    Top,
    Bottom,
    CenterY,
}

impl GuideEdge {
    pub fn orientation(self) -> GuideOrientation {
        match self {
            GuideEdge::Left | GuideEdge::Right | GuideEdge::CenterX => GuideOrientation::Vertical,
            GuideEdge::Top | GuideEdge::Bottom | GuideEdge::CenterY => GuideOrientation::Horizontal,
        }
    }

    fn pick(self, rect: &Rect) -> f64 {
        match self {
            GuideEdge::Left => rect.x0,
            GuideEdge::Right => rect.x1,
            GuideEdge::CenterX => rect.center().x,
            GuideEdge::Top => rect.y0,
            GuideEdge::Bottom => rect.y1,
            GuideEdge::CenterY => rect.center().y,
        }
    }

    const ALL: [GuideEdge; 6] = [
        GuideEdge::Left,
        GuideEdge::Right,
        GuideEdge::CenterX,
        GuideEdge::Top,
        GuideEdge::Bottom,
        GuideEdge::CenterY,
    ];
}

/// A transient guide line. Never persisted with the document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub edge: GuideEdge,
    /// X for vertical guides, Y for horizontal ones; taken from the other element.
    pub position: f64,
}

impl Guide {
    pub fn orientation(&self) -> GuideOrientation {
        self.edge.orientation()
    }
}

/// Compare the moving element's edges and centers with every other element.
///
/// Pass the rendered (rotation-aware) bounds. Each edge is compared with the
/// same edge of the others: left with left, center with center, and so on.
pub fn alignment_guides<I>(moving: Rect, others: I, threshold: f64) -> Vec<Guide>
where
    I: IntoIterator<Item = Rect>,
{
    let mut guides: Vec<Guide> = Vec::new();

    for other in others {
        for edge in GuideEdge::ALL {
            let position = edge.pick(&other);
            if (edge.pick(&moving) - position).abs() >= threshold {
                continue;
            }
            let duplicate = guides
                .iter()
                .any(|g| g.edge == edge && (g.position - position).abs() < f64::EPSILON);
            if !duplicate {
                guides.push(Guide { edge, position });
            }
        }
    }

    guides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_edges_align() {
        let moving = Rect::new(102.0, 300.0, 152.0, 340.0);
        let other = Rect::new(100.0, 0.0, 400.0, 50.0);
        let guides = alignment_guides(moving, [other], GUIDE_THRESHOLD);
        assert_eq!(
            guides,
            vec![Guide {
                edge: GuideEdge::Left,
                position: 100.0
            }]
        );
        assert_eq!(guides[0].orientation(), GuideOrientation::Vertical);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let moving = Rect::new(105.0, 300.0, 155.0, 340.0);
        let other = Rect::new(100.0, 0.0, 400.0, 50.0);
        assert!(alignment_guides(moving, [other], GUIDE_THRESHOLD).is_empty());
    }

    #[test]
    fn test_centers_and_horizontal_edges() {
        let moving = Rect::new(0.0, 98.0, 100.0, 148.0);
        let other = Rect::new(300.0, 100.0, 400.0, 150.0);
        let guides = alignment_guides(moving, [other], GUIDE_THRESHOLD);
        let edges: Vec<_> = guides.iter().map(|g| g.edge).collect();
        assert_eq!(edges, vec![GuideEdge::Top, GuideEdge::Bottom, GuideEdge::CenterY]);
        assert!(guides.iter().all(|g| g.orientation() == GuideOrientation::Horizontal));
    }

    #[test]
    fn test_duplicate_guides_collapse() {
        let moving = Rect::new(0.0, 500.0, 10.0, 520.0);
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(0.0, 100.0, 80.0, 150.0);
        let guides = alignment_guides(moving, [a, b], GUIDE_THRESHOLD);
        assert_eq!(guides.len(), 1);
    }

    #[test]
    fn test_no_others_no_guides() {
        let moving = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(alignment_guides(moving, std::iter::empty(), GUIDE_THRESHOLD).is_empty());
    }
}

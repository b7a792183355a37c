//! Geometry of the search: coordinate conversion and the segment chain.
//!
//! The cube is walked "diagonally": at every level of the recursion a
//! [`CyclicSequence`] of the remaining axes picks which axis is resolved next,
//! while the other axes stay on the current diagonal shell. Each innermost
//! step lays down one run of consecutive set coordinates along a single axis.
//! Those runs are the segments the solver fills.
//!
//! Recursion depth during construction is bounded by the dimensionality.

use std::ops::Range;

use tracing::debug;

use crate::cycle::CyclicSequence;
use crate::error::{GeneratorError, Result};
use crate::grid::{dimension_scales, magic_constant, Value};
use crate::permutations::{factorial, PermutationTable, MAX_PERMUTATION_WIDTH};

/// Index of a segment in [`Topology::segments`].
pub type SegmentId = usize;

/// A contiguous run of set coordinates that must sum to a shared target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// First set coordinate of the run.
    pub start: usize,
    pub length: usize,
    /// Whether this is the first run along its axis (solidified first).
    pub is_axis: bool,
    /// Set coordinates, all placed before `start`, whose values are
    /// subtracted from the magic constant to give this segment's target.
    pub sum_complement: Vec<usize>,
    /// Extra lines that must sum to the same target once this segment's
    /// last value is about to be placed.
    pub sum_checks: Vec<Vec<usize>>,
    pub next: Option<SegmentId>,
}

impl Segment {
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    #[inline]
    pub fn cells(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Everything the solver and the printer need, built once per (N, D).
#[derive(Clone, Debug)]
pub struct Topology {
    side_length: usize,
    dimensionality: usize,
    set_size: usize,
    scales: Vec<usize>,
    magic_constant: Value,
    /// Cube coordinate -> set coordinate.
    conv: Vec<usize>,
    /// Axis segments first, then regular ones, linked in that order.
    segments: Vec<Segment>,
    axis_segment_count: usize,
    /// The last run of the walk. Its values are forced once every other
    /// segment is placed, so it is never searched.
    forced_segment: Option<Segment>,
    permutations: PermutationTable,
}

impl Topology {
    /// Builds the topology for a grid of side `side_length` in
    /// `dimensionality` dimensions.
    pub fn new(side_length: usize, dimensionality: usize) -> Result<Self> {
        if side_length < 1 {
            return Err(GeneratorError::InvalidSideLength(side_length));
        }
        if dimensionality < 2 {
            return Err(GeneratorError::InvalidDimensionality(dimensionality));
        }
        let too_large = GeneratorError::TooLarge {
            side_length,
            dimensionality,
        };
        if side_length.max(dimensionality) > MAX_PERMUTATION_WIDTH {
            return Err(too_large);
        }
        let set_size = u32::try_from(dimensionality)
            .ok()
            .and_then(|d| side_length.checked_pow(d))
            .filter(|&size| size <= u32::MAX as usize);
        let (Some(set_size), Some(magic_constant)) =
            (set_size, magic_constant(side_length, dimensionality))
        else {
            return Err(too_large);
        };

        let scales = dimension_scales(side_length, dimensionality);
        let permutations = PermutationTable::new(side_length.max(dimensionality));

        if side_length == 1 {
            // the origin is the whole grid
            return Ok(Self {
                side_length,
                dimensionality,
                set_size,
                scales,
                magic_constant,
                conv: vec![0],
                segments: Vec::new(),
                axis_segment_count: 0,
                forced_segment: None,
                permutations,
            });
        }

        let mut walk = DiagonalWalk::new(side_length, &scales, set_size);
        // reversed so the recursion visits axis 0 first
        let axes = CyclicSequence::new((0..dimensionality).rev().collect());
        walk.visit(axes, dimensionality - 1, vec![side_length; dimensionality], 0);

        let DiagonalWalk {
            mut conv,
            mut axis_segments,
            mut regular_segments,
            ..
        } = walk;

        gather_axis_blocks(
            &mut conv,
            &mut axis_segments,
            &mut regular_segments,
            side_length,
        );

        let forced_segment = regular_segments.pop().map(|mut segment| {
            translate_to_set_coordinates(&mut segment, &conv);
            segment
        });

        let axis_segment_count = axis_segments.len();
        let mut segments: Vec<Segment> = axis_segments.into_iter().chain(regular_segments).collect();
        let segment_count = segments.len();
        for (id, segment) in segments.iter_mut().enumerate() {
            translate_to_set_coordinates(segment, &conv);
            segment.next = (id + 1 < segment_count).then_some(id + 1);
        }

        debug!(
            side_length,
            dimensionality,
            axis_segments = axis_segment_count,
            regular_segments = segment_count - axis_segment_count,
            "built topology"
        );

        Ok(Self {
            side_length,
            dimensionality,
            set_size,
            scales,
            magic_constant,
            conv,
            segments,
            axis_segment_count,
            forced_segment,
            permutations,
        })
    }

    pub fn side_length(&self) -> usize {
        self.side_length
    }

    pub fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    /// Number of cells, `N^D`.
    pub fn set_size(&self) -> usize {
        self.set_size
    }

    /// `N^axis` for every axis.
    pub fn scales(&self) -> &[usize] {
        &self.scales
    }

    pub fn magic_constant(&self) -> Value {
        self.magic_constant
    }

    /// Cube coordinate -> set coordinate table.
    pub fn conv(&self) -> &[usize] {
        &self.conv
    }

    #[inline]
    pub fn set_coordinate(&self, cube_coordinate: usize) -> usize {
        self.conv[cube_coordinate]
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id]
    }

    /// Head of the chain, `None` when there is nothing to search.
    pub fn first_segment(&self) -> Option<SegmentId> {
        (!self.segments.is_empty()).then_some(0)
    }

    pub fn axis_segment_count(&self) -> usize {
        self.axis_segment_count
    }

    /// Whether `id` is the axis segment that completes a solidification set.
    #[inline]
    pub fn is_last_axis_segment(&self, id: SegmentId) -> bool {
        id + 1 == self.axis_segment_count
    }

    pub fn forced_segment(&self) -> Option<&Segment> {
        self.forced_segment.as_ref()
    }

    pub fn permutations(&self) -> &PermutationTable {
        &self.permutations
    }

    /// Target for a segment given everything already placed in `set`.
    #[inline]
    pub fn target_for(&self, segment: &Segment, set: &[Value]) -> Value {
        self.magic_constant - segment.sum_complement.iter().map(|&i| set[i]).sum::<Value>()
    }

    /// Reorders a set-coordinate assignment into cube order.
    pub fn to_cube_order(&self, set: &[Value]) -> Vec<Value> {
        self.conv.iter().map(|&set_coordinate| set[set_coordinate]).collect()
    }

    /// Symmetric variants written per canonical solution: `(N!)^D * D!`.
    pub fn transformations_per_identity(&self) -> u128 {
        (factorial(self.side_length) as u128)
            .saturating_pow(self.dimensionality as u32)
            .saturating_mul(factorial(self.dimensionality) as u128)
    }
}

/// State of the recursive diagonal walk that lays out segments.
struct DiagonalWalk<'a> {
    side_length: usize,
    scales: &'a [usize],
    conv: Vec<usize>,
    next_value: usize,
    axes_solidified: Vec<bool>,
    /// Axes whose remaining span collapsed to one cell; the next segment
    /// laid down cross-checks their line.
    pending_checks: Vec<bool>,
    axis_segments: Vec<Segment>,
    regular_segments: Vec<Segment>,
}

impl<'a> DiagonalWalk<'a> {
    fn new(side_length: usize, scales: &'a [usize], set_size: usize) -> Self {
        Self {
            side_length,
            scales,
            conv: vec![0; set_size],
            next_value: 0,
            axes_solidified: vec![false; scales.len()],
            pending_checks: vec![false; scales.len()],
            axis_segments: Vec::new(),
            regular_segments: Vec::new(),
        }
    }

    /// Walks the sub-structure spanned by `axes`, whose remaining extent
    /// along each axis is `spans`, starting at cube coordinate `offset`.
    fn visit(&mut self, mut axes: CyclicSequence, level: usize, mut spans: Vec<usize>, mut offset: usize) {
        let diagonal_step: usize = axes.iter().map(|axis| self.scales[axis]).sum();

        if level == 0 {
            self.lay_segment(axes.current(), &spans, offset, diagonal_step);
            return;
        }

        let mut last_cell_filled = false;
        while !last_cell_filled {
            // peel off one face per axis, then step along the diagonal
            let mut face_offset = 0;
            for _ in 0..=level {
                let axis = axes.current();
                if spans[axis] == 1 {
                    self.pending_checks[axis] = true;
                }

                self.visit(axes.reduced(), level - 1, spans.clone(), offset + face_offset);

                face_offset += self.scales[axis];
                spans[axis] -= 1;
                last_cell_filled = spans[axis] == 0;
                axes.advance();
                if last_cell_filled {
                    break;
                }
            }
            offset += diagonal_step;
        }
    }

    fn lay_segment(&mut self, axis: usize, spans: &[usize], offset: usize, step: usize) {
        let length = spans[axis];
        let mut segment = Segment {
            start: self.next_value,
            length,
            is_axis: false,
            // cube coordinates until translated
            sum_complement: (1..=self.side_length - length)
                .map(|i| offset - step * i)
                .collect(),
            sum_checks: Vec::new(),
            next: None,
        };

        for i in 0..length {
            self.conv[offset + step * i] = self.next_value;
            self.next_value += 1;
        }

        for check_axis in 1..self.scales.len() {
            if std::mem::take(&mut self.pending_checks[check_axis]) {
                let scale = self.scales[check_axis];
                segment
                    .sum_checks
                    .push((1..self.side_length).map(|j| offset - scale * j).collect());
            }
        }

        if self.axes_solidified[axis] {
            self.regular_segments.push(segment);
            return;
        }

        if self.axis_segments.is_empty() {
            // set coordinate 0 holds the origin value before the search starts
            segment.start += 1;
            segment.length -= 1;
            segment.sum_complement.push(offset);
        }
        segment.is_axis = true;
        self.axis_segments.push(segment);
        self.axes_solidified[axis] = true;
    }
}

/// Moves every axis segment into one block at the front of set-coordinate
/// space, so solidified values never move once resolved.
///
/// `conv` is indexed by cube coordinate but has to be edited in set
/// coordinates, so the edit happens on its inverse.
fn gather_axis_blocks(
    conv: &mut [usize],
    axis_segments: &mut [Segment],
    regular_segments: &mut [Segment],
    side_length: usize,
) {
    let mut inverse = vec![0; conv.len()];
    for (cube_coordinate, &set_coordinate) in conv.iter().enumerate() {
        inverse[set_coordinate] = cube_coordinate;
    }

    // the first two axis segments are already adjacent
    let mut insertion = 2 * side_length - 1;
    for segment in axis_segments.iter_mut().skip(2) {
        let original_start = segment.start;
        let block: Vec<usize> = inverse.drain(segment.cells()).collect();
        inverse.splice(insertion..insertion, block);

        for shifted in regular_segments
            .iter_mut()
            .take_while(|regular| regular.start < original_start)
        {
            shifted.start += segment.length;
        }

        segment.start = insertion;
        insertion += segment.length;
    }

    for (set_coordinate, &cube_coordinate) in inverse.iter().enumerate() {
        conv[cube_coordinate] = set_coordinate;
    }
}

fn translate_to_set_coordinates(segment: &mut Segment, conv: &[usize]) {
    for index in &mut segment.sum_complement {
        *index = conv[*index];
    }
    for check in &mut segment.sum_checks {
        for index in check.iter_mut() {
            *index = conv[*index];
        }
    }
}
